pub use crate::config::*;

/// A builder for assembling a ballot before submission.
///
/// ```
/// pub use ballot_ledger::builder::BallotBuilder;
///
/// let mut builder = BallotBuilder::new("Amine");
/// builder.phone("0550 00 00 00");
/// builder.picks("Best club", &["MCA", "USMA"]);
///
/// let ballot = builder.build();
/// assert_eq!(ballot.selections.len(), 1);
/// ```
///
/// The builder only collects: the contest rules are applied by
/// `submit_ballot`, not here. Blank pick entries are dropped on insertion,
/// the way a form widget drops empty slots.
pub struct BallotBuilder {
    _identity: VoterIdentity,
    _selections: Vec<(String, Vec<String>)>,
}

impl BallotBuilder {
    pub fn new(name: &str) -> BallotBuilder {
        BallotBuilder {
            _identity: VoterIdentity {
                name: name.to_string(),
                phone: None,
                media: None,
            },
            _selections: Vec::new(),
        }
    }

    pub fn phone(&mut self, phone: &str) -> &mut BallotBuilder {
        self._identity.phone = Some(phone.to_string());
        self
    }

    pub fn media(&mut self, media: &str) -> &mut BallotBuilder {
        self._identity.media = Some(media.to_string());
        self
    }

    /// Sets the ranked picks for one category, in order of preference.
    ///
    /// A category that was already set is replaced. Blank entries are
    /// skipped.
    pub fn picks(&mut self, category: &str, candidates: &[&str]) -> &mut BallotBuilder {
        let cleaned: Vec<String> = candidates
            .iter()
            .filter(|c| !c.trim().is_empty())
            .map(|c| c.to_string())
            .collect();
        self._selections.retain(|(name, _)| name != category);
        self._selections.push((category.to_string(), cleaned));
        self
    }

    pub fn build(&self) -> Ballot {
        Ballot {
            identity: self._identity.clone(),
            selections: self._selections.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_picks_are_dropped() {
        let mut b = BallotBuilder::new("Amine");
        b.picks("Best club", &["MCA", "", "  ", "USMA"]);
        let ballot = b.build();
        assert_eq!(
            ballot.selections,
            vec![(
                "Best club".to_string(),
                vec!["MCA".to_string(), "USMA".to_string()]
            )]
        );
    }

    #[test]
    fn setting_a_category_twice_replaces_it() {
        let mut b = BallotBuilder::new("Amine");
        b.picks("Best club", &["MCA"]);
        b.picks("Best club", &["USMA"]);
        let ballot = b.build();
        assert_eq!(ballot.selections.len(), 1);
        assert_eq!(ballot.selections[0].1, vec!["USMA".to_string()]);
    }
}

use std::fmt;

/// A tier whose label (or value text) matched no value rule.
///
/// The tier is left out of the game and every aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueParseError {
    pub game_id: String,
    pub label: String,
}

impl fmt::Display for ValueParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.label.is_empty() {
            write!(f, "game {}: unlabelled tier has no value", self.game_id)
        } else {
            write!(
                f,
                "game {}: cannot parse prize value from '{}'",
                self.game_id, self.label
            )
        }
    }
}

impl std::error::Error for ValueParseError {}

/// Reconciliation of a whole game failed; no partial prize list is emitted.
#[derive(Debug, Clone, PartialEq)]
pub enum ReconcileError {
    /// The observation carries no usable game id.
    MissingGameId,
    /// The ticket price is missing or not a non-negative number.
    InvalidPrice { game_id: String, raw: Option<String> },
    /// A tier reports neither total nor remaining, and no claimed count
    /// fills the gap.
    UnresolvableTier { game_id: String, label: String },
    /// A count has to be estimated but the carried ratio is zero.
    ZeroRatio { game_id: String, label: String },
    /// No tier survived value normalization.
    NoUsableTiers { game_id: String },
}

impl ReconcileError {
    pub fn game_id(&self) -> Option<&str> {
        match self {
            ReconcileError::MissingGameId => None,
            ReconcileError::InvalidPrice { game_id, .. }
            | ReconcileError::UnresolvableTier { game_id, .. }
            | ReconcileError::ZeroRatio { game_id, .. }
            | ReconcileError::NoUsableTiers { game_id } => Some(game_id),
        }
    }
}

impl fmt::Display for ReconcileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconcileError::MissingGameId => write!(f, "observation has no game id"),
            ReconcileError::InvalidPrice { game_id, raw } => match raw {
                Some(raw) => write!(f, "game {game_id}: invalid price '{raw}'"),
                None => write!(f, "game {game_id}: missing price"),
            },
            ReconcileError::UnresolvableTier { game_id, label } => write!(
                f,
                "game {game_id}: tier '{label}' reports neither total nor remaining"
            ),
            ReconcileError::ZeroRatio { game_id, label } => write!(
                f,
                "game {game_id}: tier '{label}' needs an estimate but the remaining ratio is 0"
            ),
            ReconcileError::NoUsableTiers { game_id } => {
                write!(f, "game {game_id}: no tier with a usable value")
            }
        }
    }
}

impl std::error::Error for ReconcileError {}

/// One game of a batch that failed to reconcile.
#[derive(Debug, Clone, PartialEq)]
pub struct GameFailure {
    /// Position of the observation in the batch input.
    pub index: usize,
    pub url: Option<String>,
    pub error: ReconcileError,
}

impl fmt::Display for GameFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "record {}: {}", self.index, self.error)?;
        if let Some(url) = &self.url {
            write!(f, " ({url})")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_game_and_label() {
        let e = ValueParseError {
            game_id: "0042".to_string(),
            label: "MYSTERY".to_string(),
        };
        assert_eq!(e.to_string(), "game 0042: cannot parse prize value from 'MYSTERY'");

        let e = ReconcileError::ZeroRatio {
            game_id: "7".to_string(),
            label: "$5".to_string(),
        };
        assert!(e.to_string().contains("ratio is 0"));
        assert_eq!(e.game_id(), Some("7"));
        assert_eq!(ReconcileError::MissingGameId.game_id(), None);
    }

    #[test]
    fn failure_display_includes_url() {
        let f = GameFailure {
            index: 3,
            url: Some("https://example.test/g/1".to_string()),
            error: ReconcileError::MissingGameId,
        };
        assert_eq!(
            f.to_string(),
            "record 3: observation has no game id (https://example.test/g/1)"
        );
    }
}

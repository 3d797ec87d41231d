use serde::{Deserialize, Serialize};

/// Highest score any label can contribute
pub const MAX_LABEL_SCORE: u8 = 5;

/// Which answer vocabulary a label belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabelScale {
    /// Poor / Average / Good
    Qualitative,
    /// Yes / No
    Binary,
}

/// Answer labels the model is instructed to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnswerLabel {
    Poor,
    Average,
    Good,
    Yes,
    No,
}

impl AnswerLabel {
    pub const ALL: [AnswerLabel; 5] = [
        AnswerLabel::Poor,
        AnswerLabel::Average,
        AnswerLabel::Good,
        AnswerLabel::Yes,
        AnswerLabel::No,
    ];

    /// Exact, case-sensitive lookup
    pub fn parse(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.as_str() == label)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AnswerLabel::Poor => "Poor",
            AnswerLabel::Average => "Average",
            AnswerLabel::Good => "Good",
            AnswerLabel::Yes => "Yes",
            AnswerLabel::No => "No",
        }
    }

    pub fn score(self) -> u8 {
        match self {
            AnswerLabel::Poor => 1,
            AnswerLabel::Average => 3,
            AnswerLabel::Good => 5,
            AnswerLabel::Yes => 5,
            AnswerLabel::No => 1,
        }
    }

    pub fn scale(self) -> LabelScale {
        match self {
            AnswerLabel::Poor | AnswerLabel::Average | AnswerLabel::Good => LabelScale::Qualitative,
            AnswerLabel::Yes | AnswerLabel::No => LabelScale::Binary,
        }
    }
}

impl std::fmt::Display for AnswerLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_scores() {
        assert_eq!(AnswerLabel::Poor.score(), 1);
        assert_eq!(AnswerLabel::Average.score(), 3);
        assert_eq!(AnswerLabel::Good.score(), 5);
        assert_eq!(AnswerLabel::Yes.score(), 5);
        assert_eq!(AnswerLabel::No.score(), 1);
    }

    #[test]
    fn test_parse_is_exact() {
        assert_eq!(AnswerLabel::parse("Good"), Some(AnswerLabel::Good));
        assert_eq!(AnswerLabel::parse("No"), Some(AnswerLabel::No));
        assert_eq!(AnswerLabel::parse("good"), None);
        assert_eq!(AnswerLabel::parse(" Yes"), None);
        assert_eq!(AnswerLabel::parse("Excellent"), None);
    }

    #[test]
    fn test_scales_partition_vocabulary() {
        let qualitative: Vec<_> = AnswerLabel::ALL
            .into_iter()
            .filter(|l| l.scale() == LabelScale::Qualitative)
            .collect();
        assert_eq!(qualitative, vec![AnswerLabel::Poor, AnswerLabel::Average, AnswerLabel::Good]);

        for label in AnswerLabel::ALL {
            assert!(label.score() >= 1 && label.score() <= MAX_LABEL_SCORE);
            assert_eq!(AnswerLabel::parse(&label.to_string()), Some(label));
        }
    }
}

use crate::Sentiment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TopicModelSelector {
    Positive,
    Negative,
}

impl TopicModelSelector {
    pub fn polarity(&self) -> Sentiment {
        match self {
            TopicModelSelector::Positive => Sentiment::Positive,
            TopicModelSelector::Negative => Sentiment::Negative,
        }
    }
}

pub fn route(label: Sentiment) -> TopicModelSelector {
    match label {
        Sentiment::Positive => TopicModelSelector::Positive,
        Sentiment::Negative => TopicModelSelector::Negative,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_by_polarity() {
        assert_eq!(route(Sentiment::Positive), TopicModelSelector::Positive);
        assert_eq!(route(Sentiment::Negative), TopicModelSelector::Negative);
        for s in [Sentiment::Positive, Sentiment::Negative] {
            assert_eq!(route(s).polarity(), s);
        }
    }
}

/// A pairing between a proceeding and a media item, by index into their source lists.
///
/// At least one side is always present; the enum makes the both-absent case unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchPair {
    /// Both sides refer to the same speech
    Matched { proceeding: usize, media: usize },
    /// Media item with no known proceeding counterpart
    MediaOnly { media: usize },
    /// Proceeding with no media counterpart
    ProceedingOnly { proceeding: usize },
}

impl MatchPair {
    /// Pair a media item with an optional proceeding
    pub fn for_media(proceeding: Option<usize>, media: usize) -> Self {
        match proceeding {
            Some(proceeding) => MatchPair::Matched { proceeding, media },
            None => MatchPair::MediaOnly { media },
        }
    }

    pub fn proceeding(&self) -> Option<usize> {
        match *self {
            MatchPair::Matched { proceeding, .. } | MatchPair::ProceedingOnly { proceeding } => {
                Some(proceeding)
            }
            MatchPair::MediaOnly { .. } => None,
        }
    }

    pub fn media(&self) -> Option<usize> {
        match *self {
            MatchPair::Matched { media, .. } | MatchPair::MediaOnly { media } => Some(media),
            MatchPair::ProceedingOnly { .. } => None,
        }
    }

    /// Both sides present
    pub fn is_matched(&self) -> bool {
        matches!(self, MatchPair::Matched { .. })
    }
}

/// Categorization of a pair for run segmentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunKind {
    /// Proceeding side present
    Match,
    /// Proceeding side absent
    Unmatch,
}

impl RunKind {
    pub fn of(pair: &MatchPair) -> Self {
        if pair.proceeding().is_some() {
            RunKind::Match
        } else {
            RunKind::Unmatch
        }
    }
}

/// A maximal stretch of consecutive pairs sharing one `RunKind`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub kind: RunKind,
    pub pairs: Vec<MatchPair>,
}

impl Run {
    /// Proceeding of the last pair, the anchor for a following unmatched run
    pub fn trailing_proceeding(&self) -> Option<usize> {
        self.pairs.last().and_then(MatchPair::proceeding)
    }

    /// Proceeding of the first pair, the anchor for a preceding unmatched run
    pub fn leading_proceeding(&self) -> Option<usize> {
        self.pairs.first().and_then(MatchPair::proceeding)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

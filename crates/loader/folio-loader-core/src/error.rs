//! Error types for the loader.

use serde::{Deserialize, Serialize};

use crate::ids::{CardId, HandleId, TimerId};

/// Misuse of the loader API by its host.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LoaderError {
    #[error("unknown image handle {0:?}")]
    UnknownHandle(HandleId),

    #[error("unknown card {0:?}")]
    UnknownCard(CardId),

    #[error("timer {0:?} was not issued by this loader or already fired")]
    UnknownTimer(TimerId),
}

/// Why an image finished without loading. Failures are terminal but never
/// block the queue.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureKind {
    #[error("no source found for image")]
    MissingSource,

    #[error("browser reported a load error")]
    LoadError,

    #[error("image did not settle before its deadline")]
    Stalled,
}

use async_trait::async_trait;

use crate::{error::ModelError, types::Transcript};

/// One blocking round-trip to the model: the whole transcript goes out,
/// one raw reply comes back.
#[async_trait]
pub trait ChatHandler: Send {
    async fn complete(&mut self, transcript: &Transcript) -> Result<String, ModelError>;
}

use std::path::Path;
use std::sync::Arc;
use tracing::info;

use crate::error::{LrcShiftError, Result};
use crate::media::MediaToolkit;
use crate::scratch::ScratchContext;
use super::{
    EmbeddedTagStrategy, LyricFileStrategy, LyricSource, LyricSourceStrategy, RequestedKind,
    SourceKind, SubtitleStreamStrategy,
};

/// Turns an input path into a [`LyricSource`].
///
/// Strategies are kept in priority order: lyric file, embedded tag, then
/// subtitle stream. Auto detection returns the first one that applies.
pub struct LyricSourceResolver {
    strategies: Vec<Box<dyn LyricSourceStrategy>>,
}

impl LyricSourceResolver {
    pub fn new(
        toolkit: Arc<dyn MediaToolkit>,
        scratch: Arc<ScratchContext>,
        lyrics_tag: impl Into<String>,
    ) -> Self {
        Self::with_strategies(vec![
            Box::new(LyricFileStrategy::new(toolkit.clone())),
            Box::new(EmbeddedTagStrategy::new(toolkit.clone(), lyrics_tag)),
            Box::new(SubtitleStreamStrategy::new(toolkit, scratch)),
        ])
    }

    pub fn with_strategies(strategies: Vec<Box<dyn LyricSourceStrategy>>) -> Self {
        Self { strategies }
    }

    fn strategy_for(&self, kind: SourceKind) -> Result<&dyn LyricSourceStrategy> {
        self.strategies
            .iter()
            .find(|s| s.kind() == kind)
            .map(|s| &**s)
            .ok_or_else(|| LrcShiftError::UnknownSourceKind(kind.to_string()))
    }

    pub async fn resolve(&self, path: &Path, requested: RequestedKind) -> Result<LyricSource> {
        match requested {
            RequestedKind::Only(kind) => self.strategy_for(kind)?.resolve(path).await,
            RequestedKind::Auto => {
                for strategy in &self.strategies {
                    if let Some(source) = strategy.try_resolve(path).await {
                        info!("Detected {} lyrics in {}", source.kind, path.display());
                        return Ok(source);
                    }
                }
                Err(LrcShiftError::NoLyricsFound(path.display().to_string()))
            }
        }
    }
}

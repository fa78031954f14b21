use std::sync::Arc;

use crate::{
    domain::{MatchId, r#match::MatchRepository},
    workflow::{RecordError, RecordResult, storage_failure},
};

#[async_trait::async_trait]
pub trait DeleteMatchUseCase {
    async fn delete_match(&self, id: MatchId) -> RecordResult<()>;
}

pub struct DeleteMatchUseCaseImpl<M: MatchRepository> {
    match_repository: Arc<M>,
}

impl<M: MatchRepository> DeleteMatchUseCaseImpl<M> {
    pub fn new(match_repository: Arc<M>) -> Self {
        Self { match_repository }
    }
}

#[async_trait::async_trait]
impl<M: MatchRepository + Send + Sync + 'static> DeleteMatchUseCase for DeleteMatchUseCaseImpl<M> {
    async fn delete_match(&self, id: MatchId) -> RecordResult<()> {
        let existing = self
            .match_repository
            .get_match(id)
            .await
            .map_err(|e| storage_failure("load match", e))?;
        if existing.is_none() {
            return Err(RecordError::NotFound(format!("no match with id {}", id)));
        }

        self.match_repository
            .delete_match(id)
            .await
            .map_err(|e| storage_failure("delete match", e))?;
        log::info!("Deleted match {}", id);
        Ok(())
    }
}

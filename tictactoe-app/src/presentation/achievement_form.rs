use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::{
    domain::{AchievementId, LiveList, RecordId, achievement::Achievement},
    presentation::{FormPhase, error_banner, follow_list},
    workflow::achievement::{
        delete::DeleteAchievementUseCase, list::ListAchievementsUseCase,
        save::SaveAchievementUseCase, validate::ValidateAchievementUseCase,
    },
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AchievementFormState {
    pub phase: FormPhase,
    pub editing: RecordId<AchievementId>,
    pub name: String,
    pub description: String,
    pub name_error: Option<String>,
    pub description_error: Option<String>,
    pub success_message: Option<String>,
    pub error_message: Option<String>,
    pub search: String,
    /// Achievements matching `search`, by name.
    pub achievements: Vec<Achievement>,
}

impl AchievementFormState {
    fn fresh(&mut self, success_message: Option<String>) {
        *self = Self {
            search: std::mem::take(&mut self.search),
            achievements: std::mem::take(&mut self.achievements),
            success_message,
            ..Default::default()
        };
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AchievementFormEvent {
    NameChanged(String),
    DescriptionChanged(String),
    SearchChanged(String),
    Save,
    Clear,
    Delete(AchievementId),
    Select(AchievementId),
}

pub struct AchievementFormViewModel {
    list_achievements: Arc<dyn ListAchievementsUseCase + Send + Sync>,
    save_achievement: Arc<dyn SaveAchievementUseCase + Send + Sync>,
    delete_achievement: Arc<dyn DeleteAchievementUseCase + Send + Sync>,
    validate_achievement: Arc<dyn ValidateAchievementUseCase + Send + Sync>,
    state: Arc<watch::Sender<AchievementFormState>>,
    cancel: CancellationToken,
    // replaced whenever the search query changes
    list_cancel: Mutex<CancellationToken>,
}

impl AchievementFormViewModel {
    pub fn new(
        list_achievements: Arc<dyn ListAchievementsUseCase + Send + Sync>,
        save_achievement: Arc<dyn SaveAchievementUseCase + Send + Sync>,
        delete_achievement: Arc<dyn DeleteAchievementUseCase + Send + Sync>,
        validate_achievement: Arc<dyn ValidateAchievementUseCase + Send + Sync>,
    ) -> Self {
        let (state, _rx) = watch::channel(AchievementFormState::default());
        let cancel = CancellationToken::new();
        let list_cancel = cancel.child_token();

        let view_model = Self {
            list_achievements,
            save_achievement,
            delete_achievement,
            validate_achievement,
            state: Arc::new(state),
            cancel,
            list_cancel: Mutex::new(list_cancel.clone()),
        };
        view_model.follow(view_model.list_achievements.list_achievements(), list_cancel);
        view_model
    }

    fn follow(&self, list: LiveList<Achievement>, cancel: CancellationToken) {
        follow_list(
            list,
            self.state.clone(),
            cancel,
            |s: &mut AchievementFormState, snapshot| match snapshot {
                Ok(achievements) => s.achievements = achievements,
                Err(e) => s.error_message = Some(error_banner(&e)),
            },
        );
    }

    pub fn state(&self) -> watch::Receiver<AchievementFormState> {
        self.state.subscribe()
    }

    pub fn current(&self) -> AchievementFormState {
        self.state.borrow().clone()
    }

    pub async fn on_event(&self, event: AchievementFormEvent) {
        match event {
            AchievementFormEvent::NameChanged(name) => self.state.send_modify(|s| {
                s.phase = FormPhase::Editing;
                s.name = name;
                s.name_error = None;
                s.error_message = None;
            }),
            AchievementFormEvent::DescriptionChanged(description) => {
                self.state.send_modify(|s| {
                    s.phase = FormPhase::Editing;
                    s.description = description;
                    s.description_error = None;
                    s.error_message = None;
                })
            }
            AchievementFormEvent::SearchChanged(query) => self.search(query),
            AchievementFormEvent::Save => self.save().await,
            AchievementFormEvent::Clear => self.state.send_modify(|s| s.fresh(None)),
            AchievementFormEvent::Delete(id) => self.delete(id).await,
            AchievementFormEvent::Select(id) => self.select(id),
        }
    }

    fn search(&self, query: String) {
        let list = self.list_achievements.search_achievements(&query);
        let cancel = self.cancel.child_token();
        match self.list_cancel.lock() {
            Ok(mut current) => {
                current.cancel();
                *current = cancel.clone();
            }
            Err(e) => {
                log::error!("Achievement search state poisoned: {}", e);
                return;
            }
        }
        self.state.send_modify(|s| s.search = query);
        self.follow(list, cancel);
    }

    async fn save(&self) {
        let form = self.current();
        self.state.send_modify(|s| {
            s.phase = FormPhase::Submitting;
            s.error_message = None;
        });

        let name_error = self
            .validate_achievement
            .validate_name(&form.name, form.editing)
            .await;
        let description_error = self
            .validate_achievement
            .validate_description(&form.description);
        if name_error.is_some() || description_error.is_some() {
            self.state.send_modify(|s| {
                s.phase = FormPhase::Editing;
                s.name_error = name_error;
                s.description_error = description_error;
            });
            return;
        }

        let achievement = Achievement {
            id: form.editing,
            name: form.name.trim().to_string(),
            description: form.description.trim().to_string(),
        };
        match self.save_achievement.save_achievement(achievement).await {
            Ok(_) => {
                let message = if form.editing.is_new() {
                    "Achievement created"
                } else {
                    "Achievement updated"
                };
                self.state
                    .send_modify(|s| s.fresh(Some(message.to_string())));
            }
            Err(e) => self.state.send_modify(|s| {
                s.phase = FormPhase::Editing;
                s.error_message = Some(error_banner(&e));
            }),
        }
    }

    async fn delete(&self, id: AchievementId) {
        let phase = self.current().phase;
        self.state.send_modify(|s| {
            s.phase = FormPhase::Submitting;
            s.error_message = None;
        });

        match self.delete_achievement.delete_achievement(id).await {
            Ok(()) => self.state.send_modify(|s| {
                if s.editing == RecordId::Existing(id) {
                    s.fresh(None);
                } else {
                    s.phase = phase;
                }
                s.success_message = Some("Achievement deleted".to_string());
            }),
            Err(e) => self.state.send_modify(|s| {
                s.phase = FormPhase::Editing;
                s.error_message = Some(error_banner(&e));
            }),
        }
    }

    fn select(&self, id: AchievementId) {
        self.state.send_modify(|s| {
            let Some(achievement) = s
                .achievements
                .iter()
                .find(|a| a.id == RecordId::Existing(id))
                .cloned()
            else {
                s.error_message = Some(format!("No achievement with id {}", id));
                return;
            };
            s.fresh(None);
            s.phase = FormPhase::Editing;
            s.editing = achievement.id;
            s.name = achievement.name;
            s.description = achievement.description;
        });
    }
}

impl Drop for AchievementFormViewModel {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        domain::{achievement::AchievementRepository, mock::MockStore},
        workflow::achievement::{
            delete::DeleteAchievementUseCaseImpl, list::ListAchievementsUseCaseImpl,
            save::SaveAchievementUseCaseImpl, validate::ValidateAchievementUseCaseImpl,
        },
    };

    use super::*;

    fn view_model(store: &MockStore) -> AchievementFormViewModel {
        let store = Arc::new(store.clone());
        AchievementFormViewModel::new(
            Arc::new(ListAchievementsUseCaseImpl::new(store.clone())),
            Arc::new(SaveAchievementUseCaseImpl::new(store.clone())),
            Arc::new(DeleteAchievementUseCaseImpl::new(store.clone())),
            Arc::new(ValidateAchievementUseCaseImpl::new(store)),
        )
    }

    async fn seed(store: &MockStore, name: &str, description: &str) -> AchievementId {
        store
            .insert_achievement(&Achievement::new(name, description))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_achievement() {
        let store = MockStore::default();
        let vm = view_model(&store);
        let mut state = vm.state();

        vm.on_event(AchievementFormEvent::NameChanged("Triple".to_string()))
            .await;
        vm.on_event(AchievementFormEvent::DescriptionChanged(
            "Win three in a row".to_string(),
        ))
        .await;
        vm.on_event(AchievementFormEvent::Save).await;

        let s = state
            .wait_for(|s| s.achievements.len() == 1)
            .await
            .unwrap()
            .clone();
        assert_eq!(s.success_message.as_deref(), Some("Achievement created"));
        assert_eq!(s.name, "");
        assert_eq!(s.achievements[0].description, "Win three in a row");
    }

    #[tokio::test]
    async fn test_field_errors() {
        let store = MockStore::default();
        seed(&store, "Triple", "Win three in a row").await;
        let vm = view_model(&store);

        vm.on_event(AchievementFormEvent::NameChanged("Triple".to_string()))
            .await;
        vm.on_event(AchievementFormEvent::DescriptionChanged("meh".to_string()))
            .await;
        vm.on_event(AchievementFormEvent::Save).await;

        let s = vm.current();
        assert_eq!(s.phase, FormPhase::Editing);
        assert_eq!(
            s.name_error.as_deref(),
            Some("An achievement with that name already exists")
        );
        assert_eq!(
            s.description_error.as_deref(),
            Some("Description must be at least 5 characters")
        );
        assert_eq!(store.achievements().len(), 1);
    }

    #[tokio::test]
    async fn test_search_replaces_list() {
        let store = MockStore::default();
        seed(&store, "Triple", "Win three in a row").await;
        seed(&store, "Stalemate", "Finish with a draw").await;
        let vm = view_model(&store);
        let mut state = vm.state();
        state.wait_for(|s| s.achievements.len() == 2).await.unwrap();

        vm.on_event(AchievementFormEvent::SearchChanged("draw".to_string()))
            .await;
        let s = state
            .wait_for(|s| s.achievements.len() == 1)
            .await
            .unwrap()
            .clone();
        assert_eq!(s.search, "draw");
        assert_eq!(s.achievements[0].name, "Stalemate");

        // the search list stays live
        seed(&store, "Drawn out", "Play a long draw").await;
        state.wait_for(|s| s.achievements.len() == 2).await.unwrap();

        vm.on_event(AchievementFormEvent::SearchChanged(String::new()))
            .await;
        state.wait_for(|s| s.achievements.len() == 3).await.unwrap();
    }

    #[tokio::test]
    async fn test_select_update_and_delete() {
        let store = MockStore::default();
        let id = seed(&store, "Triple", "Win three in a row").await;
        let vm = view_model(&store);
        vm.state()
            .wait_for(|s| s.achievements.len() == 1)
            .await
            .unwrap();

        vm.on_event(AchievementFormEvent::Select(id)).await;
        assert_eq!(vm.current().name, "Triple");
        vm.on_event(AchievementFormEvent::DescriptionChanged(
            "Win three games in a row".to_string(),
        ))
        .await;
        vm.on_event(AchievementFormEvent::Save).await;
        assert_eq!(
            vm.current().success_message.as_deref(),
            Some("Achievement updated")
        );
        assert_eq!(
            store.achievements()[0].description,
            "Win three games in a row"
        );

        vm.on_event(AchievementFormEvent::Delete(id)).await;
        assert_eq!(
            vm.current().success_message.as_deref(),
            Some("Achievement deleted")
        );
        assert!(store.achievements().is_empty());
    }

    #[tokio::test]
    async fn test_deleting_another_achievement_keeps_unsaved_edits() {
        let store = MockStore::default();
        let other = seed(&store, "Triple", "Win three in a row").await;
        let vm = view_model(&store);

        vm.on_event(AchievementFormEvent::NameChanged("Comeback".to_string()))
            .await;
        vm.on_event(AchievementFormEvent::Delete(other)).await;

        let s = vm.current();
        assert_eq!(s.phase, FormPhase::Editing);
        assert_eq!(s.name, "Comeback");
        assert_eq!(s.success_message.as_deref(), Some("Achievement deleted"));
    }
}

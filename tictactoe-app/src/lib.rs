use std::sync::Arc;

use crate::{
    domain::{
        achievement::AchievementRepository, r#match::MatchRepository, player::PlayerRepository,
    },
    ports::clock::{Clock, SystemClock},
    presentation::{
        achievement_form::AchievementFormViewModel, match_form::MatchFormViewModel,
        player_form::PlayerFormViewModel,
    },
    workflow::{
        achievement::{
            delete::{DeleteAchievementUseCase, DeleteAchievementUseCaseImpl},
            list::{ListAchievementsUseCase, ListAchievementsUseCaseImpl},
            save::{SaveAchievementUseCase, SaveAchievementUseCaseImpl},
            validate::{ValidateAchievementUseCase, ValidateAchievementUseCaseImpl},
        },
        matches::{
            delete::{DeleteMatchUseCase, DeleteMatchUseCaseImpl},
            list::{ListMatchesUseCase, ListMatchesUseCaseImpl},
            save::{SaveMatchUseCase, SaveMatchUseCaseImpl},
            validate::{ValidateMatchUseCase, ValidateMatchUseCaseImpl},
        },
        player::{
            delete::{DeletePlayerUseCase, DeletePlayerUseCaseImpl},
            list::{ListPlayersUseCase, ListPlayersUseCaseImpl},
            record::{GetPlayerRecordUseCase, GetPlayerRecordUseCaseImpl},
            save::{SavePlayerUseCase, SavePlayerUseCaseImpl},
            validate::{ValidatePlayerUseCase, ValidatePlayerUseCaseImpl},
        },
    },
};

pub mod domain;
pub mod ports;
pub mod presentation;
pub mod workflow;

pub struct Application {
    pub clock: Arc<dyn Clock + Send + Sync + 'static>,

    pub player_save_use_case: Arc<dyn SavePlayerUseCase + Send + Sync + 'static>,
    pub player_delete_use_case: Arc<dyn DeletePlayerUseCase + Send + Sync + 'static>,
    pub player_list_use_case: Arc<dyn ListPlayersUseCase + Send + Sync + 'static>,
    pub player_validate_use_case: Arc<dyn ValidatePlayerUseCase + Send + Sync + 'static>,
    pub player_record_use_case: Arc<dyn GetPlayerRecordUseCase + Send + Sync + 'static>,

    pub match_save_use_case: Arc<dyn SaveMatchUseCase + Send + Sync + 'static>,
    pub match_delete_use_case: Arc<dyn DeleteMatchUseCase + Send + Sync + 'static>,
    pub match_list_use_case: Arc<dyn ListMatchesUseCase + Send + Sync + 'static>,
    pub match_validate_use_case: Arc<dyn ValidateMatchUseCase + Send + Sync + 'static>,

    pub achievement_save_use_case: Arc<dyn SaveAchievementUseCase + Send + Sync + 'static>,
    pub achievement_delete_use_case: Arc<dyn DeleteAchievementUseCase + Send + Sync + 'static>,
    pub achievement_list_use_case: Arc<dyn ListAchievementsUseCase + Send + Sync + 'static>,
    pub achievement_validate_use_case:
        Arc<dyn ValidateAchievementUseCase + Send + Sync + 'static>,
}

impl Application {
    pub fn player_form(&self) -> PlayerFormViewModel {
        PlayerFormViewModel::new(
            self.player_list_use_case.clone(),
            self.player_save_use_case.clone(),
            self.player_delete_use_case.clone(),
            self.player_validate_use_case.clone(),
        )
    }

    pub fn match_form(&self) -> MatchFormViewModel {
        MatchFormViewModel::new(
            self.match_list_use_case.clone(),
            self.player_list_use_case.clone(),
            self.match_save_use_case.clone(),
            self.match_delete_use_case.clone(),
            self.match_validate_use_case.clone(),
            self.clock.clone(),
        )
    }

    pub fn achievement_form(&self) -> AchievementFormViewModel {
        AchievementFormViewModel::new(
            self.achievement_list_use_case.clone(),
            self.achievement_save_use_case.clone(),
            self.achievement_delete_use_case.clone(),
            self.achievement_validate_use_case.clone(),
        )
    }
}

pub fn build_application<
    P: PlayerRepository + Send + Sync + 'static,
    M: MatchRepository + Send + Sync + 'static,
    A: AchievementRepository + Send + Sync + 'static,
>(
    player_repository: Arc<P>,
    match_repository: Arc<M>,
    achievement_repository: Arc<A>,
) -> Application {
    let clock = Arc::new(SystemClock);

    Application {
        clock: clock.clone(),

        player_save_use_case: Arc::new(SavePlayerUseCaseImpl::new(player_repository.clone())),
        player_delete_use_case: Arc::new(DeletePlayerUseCaseImpl::new(player_repository.clone())),
        player_list_use_case: Arc::new(ListPlayersUseCaseImpl::new(player_repository.clone())),
        player_validate_use_case: Arc::new(ValidatePlayerUseCaseImpl::new(
            player_repository.clone(),
        )),
        player_record_use_case: Arc::new(GetPlayerRecordUseCaseImpl::new(
            player_repository.clone(),
            match_repository.clone(),
        )),

        match_save_use_case: Arc::new(SaveMatchUseCaseImpl::new(
            match_repository.clone(),
            player_repository.clone(),
            clock.clone(),
        )),
        match_delete_use_case: Arc::new(DeleteMatchUseCaseImpl::new(match_repository.clone())),
        match_list_use_case: Arc::new(ListMatchesUseCaseImpl::new(match_repository)),
        match_validate_use_case: Arc::new(ValidateMatchUseCaseImpl::new(
            player_repository,
            clock,
        )),

        achievement_save_use_case: Arc::new(SaveAchievementUseCaseImpl::new(
            achievement_repository.clone(),
        )),
        achievement_delete_use_case: Arc::new(DeleteAchievementUseCaseImpl::new(
            achievement_repository.clone(),
        )),
        achievement_list_use_case: Arc::new(ListAchievementsUseCaseImpl::new(
            achievement_repository.clone(),
        )),
        achievement_validate_use_case: Arc::new(ValidateAchievementUseCaseImpl::new(
            achievement_repository,
        )),
    }
}

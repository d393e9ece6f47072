use std::sync::Arc;
use crate::domain::ports::{
    ClientRepository, ConnectionRepository, ConnectionUpdateRepository,
    OrgRepository, RatingRepository, UserRepository,
};
use crate::domain::services::auth_service::AuthService;
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub org_repo: Arc<dyn OrgRepository>,
    pub user_repo: Arc<dyn UserRepository>,
    pub client_repo: Arc<dyn ClientRepository>,
    pub connection_repo: Arc<dyn ConnectionRepository>,
    pub update_repo: Arc<dyn ConnectionUpdateRepository>,
    pub rating_repo: Arc<dyn RatingRepository>,
    pub auth_service: Arc<AuthService>,
}

use labdesk_config::Settings;
use labdesk_services::{
    AuthService,
    dao::{conference::ConferenceDao, publication::PublicationDao, user::UserDao},
};
use mongodb::Database;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub settings: Settings,
    pub auth: Arc<AuthService>,
    pub users: Arc<UserDao>,
    pub publications: Arc<PublicationDao>,
    pub conferences: Arc<ConferenceDao>,
}

impl AppState {
    pub fn new(db: Database, settings: Settings) -> Self {
        let auth = Arc::new(AuthService::new(settings.auth.clone()));
        let users = Arc::new(UserDao::new(&db, settings.auth.root_admin_email.clone()));
        let publications = Arc::new(PublicationDao::new(&db));
        let conferences = Arc::new(ConferenceDao::new(&db));

        Self {
            db,
            settings,
            auth,
            users,
            publications,
            conferences,
        }
    }
}

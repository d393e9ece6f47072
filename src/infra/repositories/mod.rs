pub mod sqlite_auth_repo;
pub mod sqlite_client_repo;
pub mod sqlite_connection_repo;
pub mod sqlite_connection_update_repo;
pub mod sqlite_org_repo;
pub mod sqlite_rating_repo;
pub mod sqlite_user_repo;

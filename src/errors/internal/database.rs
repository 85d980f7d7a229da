use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database error: {operation} failed: {source}")]
    Operation {
        operation: String,
        #[source]
        source: sea_orm::DbErr,
    },

    #[error("Migration failed for {database} database: {source}")]
    Migration {
        database: String,
        #[source]
        source: sea_orm::DbErr,
    },
}

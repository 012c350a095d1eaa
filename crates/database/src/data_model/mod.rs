pub mod reading;
pub mod snapshot;
pub mod station;

/// A row as read from the database, convertible into its domain model.
pub trait DatabaseRow {
    type Model;

    fn to_model(self) -> Self::Model;
}

pub fn to_models<R: DatabaseRow>(rows: Vec<R>) -> Vec<R::Model> {
    rows.into_iter().map(DatabaseRow::to_model).collect::<Vec<_>>()
}

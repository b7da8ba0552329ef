pub mod capture;
pub mod compare;
pub mod health;
pub mod query;
pub mod search_query;
pub mod sweep;

//! Business layer of `tube-admin`: REST clients, the shared table contract and
//! the admin user-list controller. UI-agnostic; front ends plug in prompts and
//! notifiers through the traits in [`users`].

mod config;
mod error;
mod http;
mod test_utils;

pub mod models;
pub mod table;
pub mod users;

pub use config::BusinessConfig;
pub use error::{AdminApiError, ApiResult};
pub use http::{Client, Method, RequestBuilder, Response};
pub use table::{
    Column, Pagination, ROWS_PER_PAGE_OPTIONS, RestTable, SearchFilters, Sort, SortOrder,
    TableState, UserListQuery,
};

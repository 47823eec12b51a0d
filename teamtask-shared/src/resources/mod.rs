/// Resource ownership layer
///
/// Projects and tasks are creator-owned: the `user_id` stamped at
/// creation is the sole basis for read, update, and delete rights.
/// Listings are scoped to the caller; a `team_id` on a resource is a
/// non-owning association and grants nothing to other team members.

pub mod projects;
pub mod tasks;

pub use projects::ProjectService;
pub use tasks::TaskService;

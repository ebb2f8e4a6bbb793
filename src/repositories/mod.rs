pub mod activity;
pub mod dashboard;
pub mod history;
pub mod item;
pub mod profile;
pub mod user;

pub use activity::{ActivityLogRepository, NewActivity};
pub use dashboard::DashboardRepository;
pub use history::HistoryRepository;
pub use item::{ItemMutation, ItemRepository};
pub use profile::ProfileRepository;
pub use user::{UserRepository, UserRepositoryTrait};

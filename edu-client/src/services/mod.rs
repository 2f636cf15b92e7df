pub mod http;
pub mod interceptor;
pub mod notify;
pub mod path;
pub mod quiz;
pub mod reward;
pub mod student;

pub use http::{ApiClient, RequestConfig};
pub use notify::{NotificationLevel, Notifier, RecordingNotifier, TracingNotifier};
pub use path::PathService;
pub use quiz::QuizService;
pub use reward::RewardService;
pub use student::StudentService;

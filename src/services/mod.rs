pub mod metrics;
pub mod razorpay;

pub use metrics::{get_metrics, init_metrics};
pub use razorpay::RazorpayClient;

pub mod resend;

pub use resend::{LogMailer, ResendMailer};

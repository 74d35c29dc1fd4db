pub mod controller;
pub mod transport;

pub use controller::{
    FormController, PendingSubmission, Phase, QuestionReply, QuestionRequest, SubmitError,
    Submission,
};
pub use transport::{HttpTransport, LocalTransport, SubmitRequest, Transport, TransportError};

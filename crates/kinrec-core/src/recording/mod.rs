mod session;
pub mod writer;

pub use session::{
    ArmedSession, ColorPersistJob, CountdownTick, DepthPersistJob, SessionController,
    SessionOptions, SkeletonPersistJob,
};

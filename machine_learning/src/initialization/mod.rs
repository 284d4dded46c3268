mod constant;
mod init;
mod param_gen;
mod random;

pub use constant::ConstParamGen;
pub use init::Init;
pub use param_gen::ParamGen;
pub use random::RandParamGen;

pub mod init;
pub mod run;
pub mod scan;
pub mod validate;

pub mod build_cmd;
pub mod check_cmd;
pub mod init_cmd;
pub mod plan_cmd;
pub mod scripts_cmd;

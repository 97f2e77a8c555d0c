pub mod intake_handler;

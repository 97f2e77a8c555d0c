pub mod intake_router;

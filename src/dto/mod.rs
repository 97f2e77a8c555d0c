pub mod intake_dto;

pub mod create_driver_dto;
pub mod get_driver_dto;
pub mod patch_driver_dto;
pub mod update_driver_dto;

pub mod advance_travel_request_dto;
pub mod create_travel_request_dto;
pub mod get_travel_request_dto;
pub mod nearby_travel_requests_dto;

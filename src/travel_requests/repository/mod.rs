pub mod travel_request_repository;

pub mod passenger_repository;

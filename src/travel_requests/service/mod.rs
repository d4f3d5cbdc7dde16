pub mod travel_service;

pub mod get_passenger_rto;

pub mod created_rto;

mod distance;
mod drivers;
mod passengers;
mod shared;
mod travel_requests;

use std::sync::Arc;

use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::{web, App, HttpServer};
use actix_web_httpauth::middleware::HttpAuthentication;
use distance::google_maps::GoogleMapsDistanceProvider;
use distance::DistanceProvider;
use drivers::repository::driver_repository::{
  DriverRepository, DriverRepositoryImpl,
};
use drivers::{
  create_driver, delete_driver, get_driver, list_drivers, patch_driver,
  update_driver,
};
use nanoid::nanoid;
use passengers::repository::passenger_repository::{
  PassengerRepository, PassengerRepositoryImpl,
};
use passengers::{
  create_passenger, delete_passenger, get_passenger, list_passengers,
  patch_passenger, update_passenger,
};
use shared::config::Config;
use shared::database::Database;
use shared::middleware::master_key_middleware::master_key_validator;
use travel_requests::repository::travel_request_repository::{
  TravelRequestRepository, TravelRequestRepositoryImpl,
};
use travel_requests::service::travel_service::TravelService;
use travel_requests::{
  accept_travel_request, advance_travel_request, cancel_travel_request,
  create_travel_request, get_travel_request, list_nearby_travel_requests,
};

pub fn custom_nanoid() -> String {
  nanoid!()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  env_logger::init();

  let server_address = "127.0.0.1:3001";
  let config = Config::default();

  let database = Database::new(&config.database_url)
    .await
    .expect("failed to connect to the database");
  let database = Arc::new(database);

  log::info!("Listening on http://{}", server_address);

  HttpServer::new(move || {
    App::new().configure(|cfg| {
      let driver_repository = DriverRepositoryImpl::new(database.clone());
      let passenger_repository =
        PassengerRepositoryImpl::new(database.clone());
      let travel_service = TravelService::new(
        TravelRequestRepositoryImpl::new(database.clone()),
        GoogleMapsDistanceProvider::new(&config),
        &config,
      );
      configure_app(
        cfg,
        config.clone(),
        driver_repository,
        passenger_repository,
        travel_service,
      )
    })
  })
  .bind(server_address)?
  .run()
  .await
}

// Function to initialize the App
fn configure_app<DR, PR, TR, DP>(
  cfg: &mut web::ServiceConfig,
  config: Config,
  driver_repository: DR,
  passenger_repository: PR,
  travel_service: TravelService<TR, DP>,
) where
  DR: DriverRepository + 'static,
  PR: PassengerRepository + 'static,
  TR: TravelRequestRepository + 'static,
  DP: DistanceProvider + 'static,
{
  // Rate limit
  // Allow bursts with up to five requests per IP address
  // and replenishes two elements per second
  let governor_config = GovernorConfigBuilder::default()
    .requests_per_second(2)
    .burst_size(5)
    .finish()
    .unwrap();

  cfg
    .app_data(web::Data::new(config))
    .app_data(web::Data::new(driver_repository))
    .app_data(web::Data::new(passenger_repository))
    .app_data(web::Data::new(travel_service))
    .service(
      web::scope("/v1")
        .service(
          // Provisioning surface, guarded by the master key.
          web::scope("/drivers")
            .wrap(HttpAuthentication::with_fn(master_key_validator))
            .wrap(Governor::new(&governor_config))
            .route("", web::get().to(list_drivers::<DR>))
            .route("", web::post().to(create_driver::<DR>))
            .route("/{uuid}", web::get().to(get_driver::<DR>))
            .route("/{uuid}", web::put().to(update_driver::<DR>))
            .route("/{uuid}", web::patch().to(patch_driver::<DR>))
            .route("/{uuid}", web::delete().to(delete_driver::<DR>)),
        )
        .service(
          web::scope("/passengers")
            .wrap(HttpAuthentication::with_fn(master_key_validator))
            .wrap(Governor::new(&governor_config))
            .route("", web::get().to(list_passengers::<PR>))
            .route("", web::post().to(create_passenger::<PR>))
            .route("/{uuid}", web::get().to(get_passenger::<PR>))
            .route("/{uuid}", web::put().to(update_passenger::<PR>))
            .route("/{uuid}", web::patch().to(patch_passenger::<PR>))
            .route("/{uuid}", web::delete().to(delete_passenger::<PR>)),
        )
        .service(
          web::scope("/travel-requests")
            .wrap(Governor::new(&governor_config))
            .route("", web::post().to(create_travel_request::<TR, DP>))
            .route(
              "/nearby",
              web::get().to(list_nearby_travel_requests::<TR, DP>),
            )
            .route("/{uuid}", web::get().to(get_travel_request::<TR, DP>))
            .route(
              "/{uuid}/accept",
              web::put().to(accept_travel_request::<TR, DP>),
            )
            .route(
              "/{uuid}/status",
              web::put().to(advance_travel_request::<TR, DP>),
            )
            .route(
              "/{uuid}/cancel",
              web::put().to(cancel_travel_request::<TR, DP>),
            ),
        ),
    );
}

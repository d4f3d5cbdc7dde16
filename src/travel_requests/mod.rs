pub mod dto;
pub mod model;
pub mod repository;
pub mod rto;
pub mod service;

use std::time::Duration;

use actix_web::{http::header, web, HttpResponse, Responder};
use dto::advance_travel_request_dto::AdvanceTravelRequestDto;
use dto::create_travel_request_dto::CreateTravelRequestDto;
use dto::get_travel_request_dto::GetTravelRequestDto;
use dto::nearby_travel_requests_dto::NearbyTravelRequestsDto;
use model::TravelRequest;
use rto::get_travel_request_rto::GetTravelRequestRto;
use rto::nearby_travel_request_rto::NearbyTravelRequestRto;
use service::travel_service::{
  NearbyTravelRequest, TravelService, TravelServiceError,
};
use validator::Validate;

use crate::distance::DistanceProvider;
use crate::shared::http_error::HttpError;
use crate::shared::model::access_token_claims::AccessTokenClaims;
use crate::shared::role::Role;
use crate::shared::rto::created_rto::CreatedRto;
use crate::travel_requests::repository::travel_request_repository::TravelRequestRepository;

pub async fn create_travel_request<TR, DP>(
  travel_service: web::Data<TravelService<TR, DP>>,
  dto: web::Json<CreateTravelRequestDto>,
  auth: AccessTokenClaims,
) -> impl Responder
where
  TR: TravelRequestRepository + 'static,
  DP: DistanceProvider + 'static,
{
  // Perform validation
  if let Err(validation_errors) = dto.validate() {
    // If validation fails, return a 400 error with details
    return HttpResponse::BadRequest().json(validation_errors);
  }
  if auth.role != Role::Passenger && !auth.is_back_office() {
    return forbidden();
  }
  travel_service
    .create_travel_request(&auth.uuid, &dto.origin, &dto.destination)
    .await
    .map(travel_request_created)
    .unwrap_or_else(service_error_response)
}

pub async fn get_travel_request<TR, DP>(
  travel_service: web::Data<TravelService<TR, DP>>,
  path: web::Path<GetTravelRequestDto>,
  auth: AccessTokenClaims,
) -> impl Responder
where
  TR: TravelRequestRepository + 'static,
  DP: DistanceProvider + 'static,
{
  // Perform validation
  if let Err(validation_errors) = path.validate() {
    return HttpResponse::BadRequest().json(validation_errors);
  }
  travel_service
    .find_travel_request(&path.uuid)
    .await
    .filter(|request| can_view(&auth, request))
    .ok_or_else(travel_request_not_found)
    .map(travel_request_found)
    .unwrap_or_else(|err| err)
}

pub async fn list_nearby_travel_requests<TR, DP>(
  travel_service: web::Data<TravelService<TR, DP>>,
  query: web::Query<NearbyTravelRequestsDto>,
  auth: AccessTokenClaims,
) -> impl Responder
where
  TR: TravelRequestRepository + 'static,
  DP: DistanceProvider + 'static,
{
  // Perform validation
  if let Err(validation_errors) = query.validate() {
    return HttpResponse::BadRequest().json(validation_errors);
  }
  if auth.role != Role::Driver && !auth.is_back_office() {
    return forbidden();
  }
  let max_travel_time = query.max_travel_seconds.map(Duration::from_secs);
  travel_service
    .list_nearby_travel_requests(&query.current_address, max_travel_time)
    .await
    .map(|nearby| {
      HttpResponse::Ok().content_type("application/json").json(
        nearby
          .into_iter()
          .map(NearbyTravelRequestRto::from)
          .collect::<Vec<_>>(),
      )
    })
    .unwrap_or_else(service_error_response)
}

pub async fn accept_travel_request<TR, DP>(
  travel_service: web::Data<TravelService<TR, DP>>,
  path: web::Path<GetTravelRequestDto>,
  auth: AccessTokenClaims,
) -> impl Responder
where
  TR: TravelRequestRepository + 'static,
  DP: DistanceProvider + 'static,
{
  if let Err(validation_errors) = path.validate() {
    return HttpResponse::BadRequest().json(validation_errors);
  }
  if auth.role != Role::Driver && !auth.is_back_office() {
    return forbidden();
  }
  travel_service
    .accept_travel_request(&path.uuid, &auth.uuid)
    .await
    .map(travel_request_found)
    .unwrap_or_else(service_error_response)
}

pub async fn advance_travel_request<TR, DP>(
  travel_service: web::Data<TravelService<TR, DP>>,
  path: web::Path<GetTravelRequestDto>,
  dto: web::Json<AdvanceTravelRequestDto>,
  auth: AccessTokenClaims,
) -> impl Responder
where
  TR: TravelRequestRepository + 'static,
  DP: DistanceProvider + 'static,
{
  if let Err(validation_errors) = path.validate() {
    return HttpResponse::BadRequest().json(validation_errors);
  }
  if auth.role != Role::Driver && !auth.is_back_office() {
    return forbidden();
  }
  travel_service
    .advance_travel_request(&path.uuid, dto.status)
    .await
    .map(travel_request_found)
    .unwrap_or_else(service_error_response)
}

pub async fn cancel_travel_request<TR, DP>(
  travel_service: web::Data<TravelService<TR, DP>>,
  path: web::Path<GetTravelRequestDto>,
  auth: AccessTokenClaims,
) -> impl Responder
where
  TR: TravelRequestRepository + 'static,
  DP: DistanceProvider + 'static,
{
  if let Err(validation_errors) = path.validate() {
    return HttpResponse::BadRequest().json(validation_errors);
  }
  // Only the requesting passenger, the matched driver, or back office may
  // cancel; anyone else learns nothing about the request.
  let request = travel_service.find_travel_request(&path.uuid).await;
  let Some(request) = request else {
    return travel_request_not_found();
  };
  if !can_view(&auth, &request) {
    return travel_request_not_found();
  }
  travel_service
    .cancel_travel_request(&path.uuid)
    .await
    .map(travel_request_found)
    .unwrap_or_else(service_error_response)
}

fn can_view(auth: &AccessTokenClaims, request: &TravelRequest) -> bool {
  request.passenger_uuid == auth.uuid
    || request.driver_uuid.as_deref() == Some(auth.uuid.as_str())
    || auth.is_back_office()
}

fn travel_request_created(request: TravelRequest) -> HttpResponse {
  HttpResponse::Created()
    .content_type("application/json")
    .append_header((
      header::LOCATION,
      format!("/v1/travel-requests/{}", request.uuid),
    ))
    .json(CreatedRto::from(request))
}

fn travel_request_found(request: TravelRequest) -> HttpResponse {
  HttpResponse::Ok()
    .content_type("application/json")
    .append_header((
      header::LOCATION,
      format!("/v1/travel-requests/{}", request.uuid),
    ))
    .json(GetTravelRequestRto::from(request))
}

fn travel_request_not_found() -> HttpResponse {
  HttpResponse::NotFound()
    .content_type("application/json")
    .json(HttpError::from("Travel request not found"))
}

fn forbidden() -> HttpResponse {
  HttpResponse::Forbidden()
    .content_type("application/json")
    .json(HttpError::from("Forbidden"))
}

fn service_error_response(error: TravelServiceError) -> HttpResponse {
  match &error {
    TravelServiceError::InvalidRequest(_) => HttpResponse::BadRequest()
      .content_type("application/json")
      .json(HttpError::from(error.to_string())),
    TravelServiceError::InvalidStateTransition { .. }
    | TravelServiceError::AlreadyMatched => HttpResponse::Conflict()
      .content_type("application/json")
      .json(HttpError::from(error.to_string())),
    TravelServiceError::NotFound => travel_request_not_found(),
    TravelServiceError::Repository(repository_error) => {
      log::error!("travel request repository error: {}", repository_error);
      HttpResponse::InternalServerError().finish()
    }
  }
}

// Transform TravelRequest domain to RTO
impl From<TravelRequest> for CreatedRto {
  fn from(request: TravelRequest) -> Self {
    Self { uuid: request.uuid }
  }
}

// Transform TravelRequest domain to RTO
impl From<TravelRequest> for GetTravelRequestRto {
  fn from(request: TravelRequest) -> Self {
    Self {
      uuid: request.uuid,
      passenger_uuid: request.passenger_uuid,
      driver_uuid: request.driver_uuid,
      origin: request.origin,
      destination: request.destination,
      status: request.status,
      created_at: request.created_at,
    }
  }
}

impl From<NearbyTravelRequest> for NearbyTravelRequestRto {
  fn from(nearby: NearbyTravelRequest) -> Self {
    Self {
      uuid: nearby.travel_request.uuid,
      origin: nearby.travel_request.origin,
      destination: nearby.travel_request.destination,
      status: nearby.travel_request.status,
      travel_time_seconds: nearby.travel_time.as_secs(),
      created_at: nearby.travel_request.created_at,
    }
  }
}

#[cfg(test)]
mod tests {
  use actix_web::http::StatusCode;

  use crate::distance::tests::FixedDistanceProvider;
  use crate::helpers::tests::{
    create_fake_access_token_claims, http_request, parse_http_response,
  };
  use crate::shared::config::Config;
  use crate::travel_requests::model::TravelRequestStatus;
  use crate::travel_requests::repository::travel_request_repository::tests::{
    sample_travel_request, InMemoryTravelRequestRepository,
  };

  use super::*;

  fn test_config() -> Config {
    Config {
      master_key: "TEST_MASTER_KEY".to_string(),
      jwt_secret: "TEST_JWT_SECRET".to_string(),
      database_url: "postgres://localhost/test".to_string(),
      maps_api_url: "http://localhost".to_string(),
      maps_api_key: "TEST_MAPS_API_KEY".to_string(),
      max_travel_seconds: 600,
      distance_timeout_ms: 2000,
    }
  }

  fn travel_service_data(
    requests: Vec<TravelRequest>,
    provider: FixedDistanceProvider,
  ) -> web::Data<TravelService<InMemoryTravelRequestRepository, FixedDistanceProvider>>
  {
    web::Data::new(TravelService::new(
      InMemoryTravelRequestRepository::with_requests(requests),
      provider,
      &test_config(),
    ))
  }

  #[actix_web::test]
  async fn test_create_travel_request_successful() {
    let travel_service =
      travel_service_data(Vec::new(), FixedDistanceProvider::new(&[]));
    let request = http_request();

    let responder = create_travel_request(
      travel_service.clone(),
      web::Json(CreateTravelRequestDto {
        origin: "Praça da Sé".to_string(),
        destination: "Aeroporto de Congonhas".to_string(),
      }),
      create_fake_access_token_claims("passenger-1", Role::Passenger),
    )
    .await;

    let rto: CreatedRto =
      parse_http_response(responder, &request, StatusCode::CREATED).await;

    // Assertions
    assert!(!rto.uuid.is_empty());
    let stored = travel_service.find_travel_request(&rto.uuid).await.unwrap();
    assert_eq!(stored.status, TravelRequestStatus::Created);
    assert_eq!(stored.passenger_uuid, "passenger-1");
  }

  #[actix_web::test]
  async fn test_create_travel_request_requires_passenger_role() {
    let travel_service =
      travel_service_data(Vec::new(), FixedDistanceProvider::new(&[]));
    let request = http_request();

    let responder = create_travel_request(
      travel_service,
      web::Json(CreateTravelRequestDto {
        origin: "Praça da Sé".to_string(),
        destination: "Aeroporto de Congonhas".to_string(),
      }),
      create_fake_access_token_claims("driver-1", Role::Driver),
    )
    .await;

    let rto: HttpError =
      parse_http_response(responder, &request, StatusCode::FORBIDDEN).await;
    assert_eq!(rto.message, "Forbidden");
  }

  #[actix_web::test]
  async fn test_create_travel_request_rejects_identical_addresses() {
    let travel_service =
      travel_service_data(Vec::new(), FixedDistanceProvider::new(&[]));
    let request = http_request();

    let responder = create_travel_request(
      travel_service,
      web::Json(CreateTravelRequestDto {
        origin: "Praça da Sé".to_string(),
        destination: "Praça da Sé".to_string(),
      }),
      create_fake_access_token_claims("passenger-1", Role::Passenger),
    )
    .await;

    let rto: HttpError =
      parse_http_response(responder, &request, StatusCode::BAD_REQUEST).await;
    assert!(rto.message.contains("must differ"));
  }

  #[actix_web::test]
  async fn test_list_nearby_travel_requests_sorted() {
    let travel_service = travel_service_data(
      vec![
        sample_travel_request("a", "Vila Madalena", TravelRequestStatus::Created, 100),
        sample_travel_request("b", "Pinheiros", TravelRequestStatus::Created, 100),
        sample_travel_request("c", "Moema", TravelRequestStatus::Created, 100),
      ],
      FixedDistanceProvider::new(&[
        ("Vila Madalena", 300),
        ("Pinheiros", 100),
        ("Moema", 500),
      ]),
    );
    let request = http_request();

    let responder = list_nearby_travel_requests(
      travel_service,
      web::Query(NearbyTravelRequestsDto {
        current_address: "Avenida Paulista".to_string(),
        max_travel_seconds: None,
      }),
      create_fake_access_token_claims("driver-1", Role::Driver),
    )
    .await;

    let rtos: Vec<NearbyTravelRequestRto> =
      parse_http_response(responder, &request, StatusCode::OK).await;

    let uuids: Vec<&str> = rtos.iter().map(|rto| rto.uuid.as_str()).collect();
    assert_eq!(uuids, vec!["b", "a", "c"]);
    assert_eq!(rtos[0].travel_time_seconds, 100);
    assert_eq!(rtos[0].status, TravelRequestStatus::Created);
  }

  #[actix_web::test]
  async fn test_list_nearby_travel_requests_requires_driver_role() {
    let travel_service =
      travel_service_data(Vec::new(), FixedDistanceProvider::new(&[]));
    let request = http_request();

    let responder = list_nearby_travel_requests(
      travel_service,
      web::Query(NearbyTravelRequestsDto {
        current_address: "Avenida Paulista".to_string(),
        max_travel_seconds: None,
      }),
      create_fake_access_token_claims("passenger-1", Role::Passenger),
    )
    .await;

    let rto: HttpError =
      parse_http_response(responder, &request, StatusCode::FORBIDDEN).await;
    assert_eq!(rto.message, "Forbidden");
  }

  #[actix_web::test]
  async fn test_accept_travel_request_conflict() {
    let travel_service = travel_service_data(
      vec![sample_travel_request("a", "Vila Madalena", TravelRequestStatus::Created, 100)],
      FixedDistanceProvider::new(&[]),
    );
    let request = http_request();

    let responder = accept_travel_request(
      travel_service.clone(),
      web::Path::from(GetTravelRequestDto {
        uuid: "a".to_string(),
      }),
      create_fake_access_token_claims("driver-1", Role::Driver),
    )
    .await;
    let rto: GetTravelRequestRto =
      parse_http_response(responder, &request, StatusCode::OK).await;
    assert_eq!(rto.status, TravelRequestStatus::Matched);
    assert_eq!(rto.driver_uuid.as_deref(), Some("driver-1"));

    // A second driver accepting the same request loses the race.
    let responder = accept_travel_request(
      travel_service,
      web::Path::from(GetTravelRequestDto {
        uuid: "a".to_string(),
      }),
      create_fake_access_token_claims("driver-2", Role::Driver),
    )
    .await;
    let rto: HttpError =
      parse_http_response(responder, &request, StatusCode::CONFLICT).await;
    assert_eq!(rto.message, "Travel request already matched");
  }

  #[actix_web::test]
  async fn test_get_travel_request_hidden_from_strangers() {
    let travel_service = travel_service_data(
      vec![sample_travel_request("a", "Vila Madalena", TravelRequestStatus::Created, 100)],
      FixedDistanceProvider::new(&[]),
    );
    let request = http_request();

    // sample requests belong to passenger-1
    let responder = get_travel_request(
      travel_service.clone(),
      web::Path::from(GetTravelRequestDto {
        uuid: "a".to_string(),
      }),
      create_fake_access_token_claims("passenger-1", Role::Passenger),
    )
    .await;
    let rto: GetTravelRequestRto =
      parse_http_response(responder, &request, StatusCode::OK).await;
    assert_eq!(rto.uuid, "a");

    let responder = get_travel_request(
      travel_service,
      web::Path::from(GetTravelRequestDto {
        uuid: "a".to_string(),
      }),
      create_fake_access_token_claims("passenger-2", Role::Passenger),
    )
    .await;
    let rto: HttpError =
      parse_http_response(responder, &request, StatusCode::NOT_FOUND).await;
    assert_eq!(rto.message, "Travel request not found");
  }

  #[actix_web::test]
  async fn test_advance_travel_request_conflict() {
    let travel_service = travel_service_data(
      vec![sample_travel_request("a", "Vila Madalena", TravelRequestStatus::Completed, 100)],
      FixedDistanceProvider::new(&[]),
    );
    let request = http_request();

    let responder = advance_travel_request(
      travel_service,
      web::Path::from(GetTravelRequestDto {
        uuid: "a".to_string(),
      }),
      web::Json(AdvanceTravelRequestDto {
        status: TravelRequestStatus::InProgress,
      }),
      create_fake_access_token_claims("driver-1", Role::Driver),
    )
    .await;

    let _rto: HttpError =
      parse_http_response(responder, &request, StatusCode::CONFLICT).await;
  }

  #[actix_web::test]
  async fn test_cancel_travel_request_by_owner() {
    let travel_service = travel_service_data(
      vec![sample_travel_request("a", "Vila Madalena", TravelRequestStatus::Created, 100)],
      FixedDistanceProvider::new(&[]),
    );
    let request = http_request();

    let responder = cancel_travel_request(
      travel_service,
      web::Path::from(GetTravelRequestDto {
        uuid: "a".to_string(),
      }),
      create_fake_access_token_claims("passenger-1", Role::Passenger),
    )
    .await;

    let rto: GetTravelRequestRto =
      parse_http_response(responder, &request, StatusCode::OK).await;
    assert_eq!(rto.status, TravelRequestStatus::Cancelled);
  }

  #[test]
  fn test_travel_request_to_get_travel_request_rto() {
    let travel_request =
      sample_travel_request("a", "Vila Madalena", TravelRequestStatus::Created, 100);

    let rto: GetTravelRequestRto = travel_request.clone().into();

    assert_eq!(rto.uuid, travel_request.uuid);
    assert_eq!(rto.passenger_uuid, travel_request.passenger_uuid);
    assert_eq!(rto.origin, travel_request.origin);
    assert_eq!(rto.destination, travel_request.destination);
    assert_eq!(rto.status, travel_request.status);
  }

  #[test]
  fn test_nearby_travel_request_to_rto() {
    let nearby = NearbyTravelRequest {
      travel_request: sample_travel_request(
        "a",
        "Vila Madalena",
        TravelRequestStatus::Created,
        100,
      ),
      travel_time: Duration::from_secs(420),
    };

    let rto: NearbyTravelRequestRto = nearby.into();

    assert_eq!(rto.uuid, "a");
    assert_eq!(rto.travel_time_seconds, 420);
  }
}

pub mod dto;
pub mod model;
pub mod repository;
pub mod rto;

use actix_web::{http::header, web, HttpResponse, Responder};
use dto::create_passenger_dto::CreatePassengerDto;
use dto::get_passenger_dto::GetPassengerDto;
use dto::patch_passenger_dto::PatchPassengerDto;
use dto::update_passenger_dto::UpdatePassengerDto;
use model::Passenger;
use repository::passenger_repository::{
  CreatePassenger, PassengerRepository, PassengerRepositoryError,
};
use rto::get_passenger_rto::GetPassengerRto;
use validator::Validate;

use crate::custom_nanoid;
use crate::shared::http_error::HttpError;
use crate::shared::rto::created_rto::CreatedRto;

pub async fn list_passengers<PR: PassengerRepository>(
  passenger_repository: web::Data<PR>,
) -> impl Responder {
  passenger_repository
    .find_all()
    .await
    .map(|passengers| {
      HttpResponse::Ok().content_type("application/json").json(
        passengers
          .into_iter()
          .map(GetPassengerRto::from)
          .collect::<Vec<_>>(),
      )
    })
    .unwrap_or_else(repository_error_response)
}

pub async fn get_passenger<PR: PassengerRepository>(
  passenger_repository: web::Data<PR>,
  path: web::Path<GetPassengerDto>,
) -> impl Responder {
  // Perform validation
  if let Err(validation_errors) = path.validate() {
    return HttpResponse::BadRequest().json(validation_errors);
  }
  passenger_repository
    .find_one(&path.uuid)
    .await
    .ok_or_else(passenger_not_found)
    .map(passenger_found)
    .unwrap_or_else(|err| err)
}

pub async fn create_passenger<PR: PassengerRepository>(
  passenger_repository: web::Data<PR>,
  dto: web::Json<CreatePassengerDto>,
) -> impl Responder {
  if let Err(validation_errors) = dto.validate() {
    return HttpResponse::BadRequest().json(validation_errors);
  }
  passenger_repository
    .create(CreatePassenger::from(dto.into_inner()))
    .await
    .map(passenger_created)
    .unwrap_or_else(repository_error_response)
}

pub async fn update_passenger<PR: PassengerRepository>(
  passenger_repository: web::Data<PR>,
  path: web::Path<GetPassengerDto>,
  dto: web::Json<UpdatePassengerDto>,
) -> impl Responder {
  if let Err(validation_errors) = dto.validate() {
    return HttpResponse::BadRequest().json(validation_errors);
  }
  let Some(passenger) = passenger_repository.find_one(&path.uuid).await else {
    return passenger_not_found();
  };
  let updated = Passenger {
    name: dto.into_inner().name,
    ..passenger
  };
  passenger_repository
    .update(updated)
    .await
    .map(passenger_found)
    .unwrap_or_else(repository_error_response)
}

pub async fn patch_passenger<PR: PassengerRepository>(
  passenger_repository: web::Data<PR>,
  path: web::Path<GetPassengerDto>,
  dto: web::Json<PatchPassengerDto>,
) -> impl Responder {
  if let Err(validation_errors) = dto.validate() {
    return HttpResponse::BadRequest().json(validation_errors);
  }
  let Some(mut passenger) = passenger_repository.find_one(&path.uuid).await
  else {
    return passenger_not_found();
  };
  // An absent name leaves the stored value untouched.
  if let Some(name) = dto.into_inner().name {
    passenger.name = name;
  }
  passenger_repository
    .update(passenger)
    .await
    .map(passenger_found)
    .unwrap_or_else(repository_error_response)
}

pub async fn delete_passenger<PR: PassengerRepository>(
  passenger_repository: web::Data<PR>,
  path: web::Path<GetPassengerDto>,
) -> impl Responder {
  match passenger_repository.delete(&path.uuid).await {
    Ok(true) => HttpResponse::NoContent().finish(),
    Ok(false) => passenger_not_found(),
    Err(error) => repository_error_response(error),
  }
}

fn passenger_created(passenger: Passenger) -> HttpResponse {
  HttpResponse::Created()
    .content_type("application/json")
    .append_header((
      header::LOCATION,
      format!("/v1/passengers/{}", passenger.uuid),
    ))
    .json(CreatedRto::from(passenger))
}

fn passenger_found(passenger: Passenger) -> HttpResponse {
  HttpResponse::Ok()
    .content_type("application/json")
    .append_header((
      header::LOCATION,
      format!("/v1/passengers/{}", passenger.uuid),
    ))
    .json(GetPassengerRto::from(passenger))
}

fn passenger_not_found() -> HttpResponse {
  HttpResponse::NotFound()
    .content_type("application/json")
    .json(HttpError::from("Passenger not found"))
}

fn repository_error_response(error: PassengerRepositoryError) -> HttpResponse {
  log::error!("passenger repository error: {}", error);
  HttpResponse::InternalServerError().finish()
}

impl From<CreatePassengerDto> for CreatePassenger {
  fn from(dto: CreatePassengerDto) -> Self {
    Self {
      uuid: custom_nanoid(),
      name: dto.name,
    }
  }
}

// Transform Passenger domain to RTO
impl From<Passenger> for GetPassengerRto {
  fn from(passenger: Passenger) -> Self {
    Self {
      uuid: passenger.uuid,
      name: passenger.name,
      created_at: passenger.created_at,
    }
  }
}

// Transform Passenger domain to RTO
impl From<Passenger> for CreatedRto {
  fn from(passenger: Passenger) -> Self {
    Self {
      uuid: passenger.uuid,
    }
  }
}

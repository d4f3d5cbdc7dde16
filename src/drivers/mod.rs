pub mod dto;
pub mod model;
pub mod repository;
pub mod rto;

use actix_web::{http::header, web, HttpResponse, Responder};
use dto::create_driver_dto::CreateDriverDto;
use dto::get_driver_dto::GetDriverDto;
use dto::patch_driver_dto::PatchDriverDto;
use dto::update_driver_dto::UpdateDriverDto;
use model::Driver;
use repository::driver_repository::{
  CreateDriver, DriverRepository, DriverRepositoryError,
};
use rto::get_driver_rto::GetDriverRto;
use validator::Validate;

use crate::custom_nanoid;
use crate::shared::http_error::HttpError;
use crate::shared::rto::created_rto::CreatedRto;

pub async fn list_drivers<DR: DriverRepository>(
  driver_repository: web::Data<DR>,
) -> impl Responder {
  driver_repository
    .find_all()
    .await
    .map(|drivers| {
      HttpResponse::Ok().content_type("application/json").json(
        drivers
          .into_iter()
          .map(GetDriverRto::from)
          .collect::<Vec<_>>(),
      )
    })
    .unwrap_or_else(repository_error_response)
}

pub async fn get_driver<DR: DriverRepository>(
  driver_repository: web::Data<DR>,
  path: web::Path<GetDriverDto>,
) -> impl Responder {
  // Perform validation
  if let Err(validation_errors) = path.validate() {
    // If validation fails, return a 400 error with details
    return HttpResponse::BadRequest().json(validation_errors);
  }
  driver_repository
    .find_one(&path.uuid)
    .await
    .ok_or_else(driver_not_found)
    .map(driver_found)
    .unwrap_or_else(|err| err)
}

pub async fn create_driver<DR: DriverRepository>(
  driver_repository: web::Data<DR>,
  dto: web::Json<CreateDriverDto>,
) -> impl Responder {
  if let Err(validation_errors) = dto.validate() {
    return HttpResponse::BadRequest().json(validation_errors);
  }
  driver_repository
    .create(CreateDriver::from(dto.into_inner()))
    .await
    .map(driver_created)
    .unwrap_or_else(repository_error_response)
}

pub async fn update_driver<DR: DriverRepository>(
  driver_repository: web::Data<DR>,
  path: web::Path<GetDriverDto>,
  dto: web::Json<UpdateDriverDto>,
) -> impl Responder {
  if let Err(validation_errors) = dto.validate() {
    return HttpResponse::BadRequest().json(validation_errors);
  }
  let Some(driver) = driver_repository.find_one(&path.uuid).await else {
    return driver_not_found();
  };
  let dto = dto.into_inner();
  let updated = Driver {
    name: dto.name,
    birth_date: dto.birth_date,
    ..driver
  };
  driver_repository
    .update(updated)
    .await
    .map(driver_found)
    .unwrap_or_else(repository_error_response)
}

pub async fn patch_driver<DR: DriverRepository>(
  driver_repository: web::Data<DR>,
  path: web::Path<GetDriverDto>,
  dto: web::Json<PatchDriverDto>,
) -> impl Responder {
  if let Err(validation_errors) = dto.validate() {
    return HttpResponse::BadRequest().json(validation_errors);
  }
  let Some(mut driver) = driver_repository.find_one(&path.uuid).await else {
    return driver_not_found();
  };
  // Absent fields leave the stored values untouched.
  let dto = dto.into_inner();
  if let Some(name) = dto.name {
    driver.name = name;
  }
  if let Some(birth_date) = dto.birth_date {
    driver.birth_date = birth_date;
  }
  driver_repository
    .update(driver)
    .await
    .map(driver_found)
    .unwrap_or_else(repository_error_response)
}

pub async fn delete_driver<DR: DriverRepository>(
  driver_repository: web::Data<DR>,
  path: web::Path<GetDriverDto>,
) -> impl Responder {
  match driver_repository.delete(&path.uuid).await {
    Ok(true) => HttpResponse::NoContent().finish(),
    Ok(false) => driver_not_found(),
    Err(error) => repository_error_response(error),
  }
}

fn driver_created(driver: Driver) -> HttpResponse {
  HttpResponse::Created()
    .content_type("application/json")
    .append_header((header::LOCATION, format!("/v1/drivers/{}", driver.uuid)))
    .json(CreatedRto::from(driver))
}

fn driver_found(driver: Driver) -> HttpResponse {
  HttpResponse::Ok()
    .content_type("application/json")
    .append_header((header::LOCATION, format!("/v1/drivers/{}", driver.uuid)))
    .json(GetDriverRto::from(driver))
}

fn driver_not_found() -> HttpResponse {
  HttpResponse::NotFound()
    .content_type("application/json")
    .json(HttpError::from("Driver not found"))
}

fn repository_error_response(error: DriverRepositoryError) -> HttpResponse {
  log::error!("driver repository error: {}", error);
  HttpResponse::InternalServerError().finish()
}

impl From<CreateDriverDto> for CreateDriver {
  fn from(dto: CreateDriverDto) -> Self {
    Self {
      uuid: custom_nanoid(),
      name: dto.name,
      birth_date: dto.birth_date,
    }
  }
}

// Transform Driver domain to RTO
impl From<Driver> for GetDriverRto {
  fn from(driver: Driver) -> Self {
    Self {
      uuid: driver.uuid,
      name: driver.name,
      birth_date: driver.birth_date,
      created_at: driver.created_at,
    }
  }
}

// Transform Driver domain to RTO
impl From<Driver> for CreatedRto {
  fn from(driver: Driver) -> Self {
    Self { uuid: driver.uuid }
  }
}

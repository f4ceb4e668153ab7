// Text boundary: raw strings from a console or form become typed requests here,
// before anything in the network, queue or ledgers is touched.
// Status travels as an ordinal at this boundary: 1 = PROCESSING,
// 2 = ON_DELIVERY, 3 = DELIVERED.

use chrono::NaiveDate;

use crate::{
    cargo::{CargoId, CityId, ClientId, Status},
    error::{DispatchError, Result},
};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn status_from_ordinal(ordinal: u8) -> Result<Status> {
    match ordinal {
        1 => Ok(Status::Processing),
        2 => Ok(Status::OnDelivery),
        3 => Ok(Status::Delivered),
        other => Err(DispatchError::InvalidInput(format!(
            "status must be 1, 2 or 3, got {other}"
        ))),
    }
}

pub fn status_ordinal(status: Status) -> u8 {
    match status {
        Status::Processing => 1,
        Status::OnDelivery => 2,
        Status::Delivered => 3,
    }
}

pub fn parse_status(raw: &str) -> Result<Status> {
    let ordinal = raw
        .trim()
        .parse::<u8>()
        .map_err(|_| DispatchError::InvalidInput(format!("status is not an ordinal: {raw:?}")))?;
    status_from_ordinal(ordinal)
}

pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|e| DispatchError::InvalidInput(format!("date {raw:?} is not yyyy-MM-dd: {e}")))
}

fn parse_number(field: &str, raw: &str) -> Result<u32> {
    raw.trim()
        .parse()
        .map_err(|_| DispatchError::InvalidInput(format!("{field} is not a number: {raw:?}")))
}

pub fn parse_cargo_id(raw: &str) -> Result<CargoId> {
    parse_number("cargo id", raw).map(CargoId)
}

pub fn parse_city_id(raw: &str) -> Result<CityId> {
    parse_number("city id", raw).map(CityId)
}

pub fn parse_client_id(raw: &str) -> Result<ClientId> {
    parse_number("client id", raw).map(ClientId)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCargoRequest {
    pub id: CargoId,
    pub date: NaiveDate,
    pub status: Status,
    pub client: ClientId,
    pub city: CityId,
}

impl CreateCargoRequest {
    pub fn new(
        id: CargoId,
        date: NaiveDate,
        status: Status,
        client: ClientId,
        city: CityId,
    ) -> Self {
        Self {
            id,
            date,
            status,
            client,
            city,
        }
    }

    // Fails on the first field that does not parse
    pub fn parse(id: &str, date: &str, status: &str, client: &str, city: &str) -> Result<Self> {
        Ok(Self {
            id: parse_cargo_id(id)?,
            date: parse_date(date)?,
            status: parse_status(status)?,
            client: parse_client_id(client)?,
            city: parse_city_id(city)?,
        })
    }
}

//! # Sensor Families Known to `oregonrx`
//!
//! | Sensor ID | Model       | Payload | Fields                                   |
//! |-----------|-------------|---------|------------------------------------------|
//! | `1D20`    | THGR122NX   | 17      | Temp, Moisture                           |
//! | `F824`    | THGR810     | 17      | Temp, Moisture                           |
//! | `F8B4`    | THGR810     | 17      | Temp, Moisture                           |
//! | `EC40`    | THN132N     | 14      | Temp                                     |
//! | `C844`    | THWR800     | 14      | Temp                                     |
//! | `1984`    | WGR800      | 19      | Direction, Wind, AverageWind             |
//! | `1994`    | WGR800      | 19      | Direction, Wind, AverageWind             |
//! | `2D10`    | RGR918      | 18      | RainRate, TotalRain                      |
//! | `2914`    | PCR800      | 20      | RainRate, TotalRain                      |
//! | `5D60`    | BTHR918N    | 21      | Temp, Moisture, Pressure                 |
//!
//! Every family also reports `SensorId`, `Channel`, `Id`, and
//! `LowBattery`, in that order, ahead of its measurements.
//!
//! Payload lengths are in nibbles and cover everything after the
//! `A` preamble, from the first sensor ID nibble through the
//! two-nibble checksum. Layouts follow the public
//! [Oregon Scientific RF protocol description](http://wmrx00.sourceforge.net/Arduino/OregonScientific-RF-Protocols.pdf).
//!
//! Units are whatever the sensor sends:
//!
//! * `Temp` in tenths of a degree Celsius
//! * `Moisture` in percent relative humidity
//! * `Direction` as a compass index, 0 – 15, in 22.5° steps
//! * `Wind` and `AverageWind` in tenths of a m/s
//! * `RainRate` and `TotalRain` in the gauge's native fixed-point units
//! * `Pressure` as the raw 12-bit barometer reading

use phf::phf_map;

use crate::checksum::ChecksumKind;
use crate::family::{
    DecodeRule, FamilyMap, FieldDescriptor, ProtocolRevision, SensorFamily, SensorKind,
};

const SENSOR_ID: FieldDescriptor = FieldDescriptor::new("SensorId", 0, 4, DecodeRule::Hex);
const CHANNEL: FieldDescriptor = FieldDescriptor::new("Channel", 4, 1, DecodeRule::Channel);
const ROLLING_ID: FieldDescriptor = FieldDescriptor::new("Id", 5, 2, DecodeRule::Hex);
const LOW_BATTERY: FieldDescriptor =
    FieldDescriptor::new("LowBattery", 7, 1, DecodeRule::Flag { mask: 0x4 });
const TEMPERATURE: FieldDescriptor =
    FieldDescriptor::new("Temp", 8, 3, DecodeRule::SignedBcd { sign_offset: 11 });
const HUMIDITY: FieldDescriptor = FieldDescriptor::new("Moisture", 12, 2, DecodeRule::Bcd);

/// Temperature and humidity
static TEMP_HYGRO_FIELDS: [FieldDescriptor; 6] = [
    SENSOR_ID,
    CHANNEL,
    ROLLING_ID,
    LOW_BATTERY,
    TEMPERATURE,
    HUMIDITY,
];

/// Temperature only
static TEMP_FIELDS: [FieldDescriptor; 5] = [SENSOR_ID, CHANNEL, ROLLING_ID, LOW_BATTERY, TEMPERATURE];

/// Wind direction, gust, and average speed
static WIND_FIELDS: [FieldDescriptor; 7] = [
    SENSOR_ID,
    CHANNEL,
    ROLLING_ID,
    LOW_BATTERY,
    FieldDescriptor::new("Direction", 8, 1, DecodeRule::Hex),
    FieldDescriptor::new("Wind", 11, 3, DecodeRule::Bcd),
    FieldDescriptor::new("AverageWind", 14, 3, DecodeRule::Bcd),
];

/// Rain rate and total, three- and five-digit counters
static RGR918_FIELDS: [FieldDescriptor; 6] = [
    SENSOR_ID,
    CHANNEL,
    ROLLING_ID,
    LOW_BATTERY,
    FieldDescriptor::new("RainRate", 8, 3, DecodeRule::Bcd),
    FieldDescriptor::new("TotalRain", 11, 5, DecodeRule::Bcd),
];

/// Rain rate and total, four- and six-digit counters
static PCR800_FIELDS: [FieldDescriptor; 6] = [
    SENSOR_ID,
    CHANNEL,
    ROLLING_ID,
    LOW_BATTERY,
    FieldDescriptor::new("RainRate", 8, 4, DecodeRule::Bcd),
    FieldDescriptor::new("TotalRain", 12, 6, DecodeRule::Bcd),
];

/// Temperature, humidity, and barometer
static TEMP_HYGRO_BARO_FIELDS: [FieldDescriptor; 7] = [
    SENSOR_ID,
    CHANNEL,
    ROLLING_ID,
    LOW_BATTERY,
    TEMPERATURE,
    HUMIDITY,
    FieldDescriptor::new("Pressure", 16, 3, DecodeRule::HexLsnFirst),
];

static THGR122NX: SensorFamily = SensorFamily::new(
    "THGR122NX",
    SensorKind::TemperatureHumidity,
    ProtocolRevision::V2,
    17,
    ChecksumKind::NibbleSum,
    &TEMP_HYGRO_FIELDS,
);

static THGR810: SensorFamily = SensorFamily::new(
    "THGR810",
    SensorKind::TemperatureHumidity,
    ProtocolRevision::V3,
    17,
    ChecksumKind::NibbleSum,
    &TEMP_HYGRO_FIELDS,
);

static THN132N: SensorFamily = SensorFamily::new(
    "THN132N",
    SensorKind::Temperature,
    ProtocolRevision::V2,
    14,
    ChecksumKind::NibbleSum,
    &TEMP_FIELDS,
);

static THWR800: SensorFamily = SensorFamily::new(
    "THWR800",
    SensorKind::Temperature,
    ProtocolRevision::V3,
    14,
    ChecksumKind::NibbleSum,
    &TEMP_FIELDS,
);

static WGR800: SensorFamily = SensorFamily::new(
    "WGR800",
    SensorKind::Wind,
    ProtocolRevision::V3,
    19,
    ChecksumKind::NibbleSum,
    &WIND_FIELDS,
);

static RGR918: SensorFamily = SensorFamily::new(
    "RGR918",
    SensorKind::Rain,
    ProtocolRevision::V2,
    18,
    ChecksumKind::NibbleSum,
    &RGR918_FIELDS,
);

static PCR800: SensorFamily = SensorFamily::new(
    "PCR800",
    SensorKind::Rain,
    ProtocolRevision::V3,
    20,
    ChecksumKind::NibbleSum,
    &PCR800_FIELDS,
);

static BTHR918N: SensorFamily = SensorFamily::new(
    "BTHR918N",
    SensorKind::TemperatureHumidityPressure,
    ProtocolRevision::V2,
    21,
    ChecksumKind::NibbleSum,
    &TEMP_HYGRO_BARO_FIELDS,
);

/// Database of Oregon Scientific sensor IDs
///
/// Several sensor IDs may share one layout.
pub(crate) static OREGON_FAMILIES: FamilyMap = phf_map! {
    // temperature + humidity
    0x1D20u16 => &THGR122NX,
    0xF824u16 => &THGR810,
    0xF8B4u16 => &THGR810,

    // temperature
    0xEC40u16 => &THN132N,
    0xC844u16 => &THWR800,

    // wind
    0x1984u16 => &WGR800,
    0x1994u16 => &WGR800,

    // rain
    0x2D10u16 => &RGR918,
    0x2914u16 => &PCR800,

    // temperature + humidity + pressure
    0x5D60u16 => &BTHR918N,
};

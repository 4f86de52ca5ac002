// Translation tables for the Arduino target

use crate::parser::ast::DataType;

/// Header every generated sketch starts with
pub const ARDUINO_HEADER: &str = "Arduino.h";

/// Source-level markers and the Arduino constants they stand for
pub const MARKERS: &[(&str, &str)] = &[
    ("SALIDA", "OUTPUT"),
    ("ENTRADA", "INPUT"),
    ("ALTO", "HIGH"),
    ("BAJO", "LOW"),
];

/// Board calls and their Arduino names
pub const CALLS: &[(&str, &str)] = &[
    ("configurar_pin", "pinMode"),
    ("escribir", "digitalWrite"),
    ("esperar", "delay"),
];

/// Arduino constant for a marker string, if it is one
pub fn marker_constant(text: &str) -> Option<&'static str> {
    MARKERS
        .iter()
        .find(|(marker, _)| *marker == text)
        .map(|(_, constant)| *constant)
}

/// Arduino function name for a call; unknown names pass through unchanged
pub fn call_name(name: &str) -> &str {
    CALLS
        .iter()
        .find(|(source, _)| *source == name)
        .map_or(name, |(_, target)| *target)
}

/// C++ type for a declared type
pub fn cpp_type(data_type: DataType) -> &'static str {
    match data_type {
        DataType::Integer => "int",
        DataType::Decimal => "float",
        DataType::Text => "String",
        DataType::Boolean => "bool",
        DataType::Undefined => "auto",
    }
}

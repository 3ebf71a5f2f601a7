//! Adapters — concrete implementations of the port traits.
//!
//! | Adapter    | Implements       | Connects to                        |
//! |------------|------------------|------------------------------------|
//! | `console`  | DiagnosticSink   | stdout (UART / USB-CDC on target)  |
//! | `gpio`     | OutputPort       | embedded-hal `OutputPin`s          |
//! | `hardware` | AnalogPort       | ESP32 ADC1 oneshot / simulated ADC |
//! | `time`     | DelayNs          | FreeRTOS delay / `thread::sleep`   |

pub mod console;
pub mod gpio;
pub mod hardware;
pub mod time;

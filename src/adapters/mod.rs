//! Adapters: concrete implementations of the port traits.
//!
//! | Adapter       | Implements            | Connects to               |
//! |---------------|-----------------------|---------------------------|
//! | `hardware`    | InputPort, OutputPort | ESP32 GPIO                |
//! | `log_sink`    | EventSink             | Serial log output         |
//! | `event_queue` | EventSink             | Channel drained by `main` |

pub mod event_queue;
pub mod hardware;
pub mod log_sink;

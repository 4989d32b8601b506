mod alert;
mod page;
mod rfid;
mod robot;
mod work_plan;

pub use alert::*;
pub use page::*;
pub use rfid::*;
pub use robot::*;
pub use work_plan::*;

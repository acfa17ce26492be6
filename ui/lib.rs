/*!
Markup components shared by the server-rendered page and the browser client. Each component is a struct of its properties that converts into an [`html::Node`](../html/enum.Node.html).
*/

mod button;
mod card;
mod run_item;
mod search_field;
mod table;

pub use self::button::*;
pub use self::card::*;
pub use self::run_item::*;
pub use self::search_field::*;
pub use self::table::*;

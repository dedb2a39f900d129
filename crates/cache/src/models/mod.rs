mod page;

pub(crate) use self::page::{PageRow, filter_column};

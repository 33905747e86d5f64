mod phone;

pub use phone::format_phone_number;

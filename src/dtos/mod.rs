pub(crate) mod reset_dtos;

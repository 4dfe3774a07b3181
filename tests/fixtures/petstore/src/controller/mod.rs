pub mod pet;

pub fn serve() {}

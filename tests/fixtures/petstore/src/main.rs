//! Pet store backend.
//!
//! @title Pet Store
//! @version 1.0
//! @description Pet management module
//! @contact.email support@petstore.example
//! @BasePath /v1
//! @schemes http https
//! @tags users user endpoints
//! @tags pets

mod controller;
mod model;

fn main() {
    controller::serve();
}

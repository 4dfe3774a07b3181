use crate::model::{Error, Pet};

/// @Summary getPets
/// @Description list pets
/// @ID pets.list
/// @Accept  json
/// @Produce  json
/// @tag users
/// @Param   page query string false  "page of the gets"
/// @Success 200 {object} @Pets  "petslist"
/// @Router /pets [get]
pub async fn get_pets() -> Vec<Pet> {
    Vec::new()
}

/// @Summary createPets
/// @Description create pets
/// @ID pets.create
/// @Accept  json
/// @Produce  json
/// @tag users
/// @Param   pets body @Pets true "pets fields"
/// @Success 200 {object} @Pets  "success"
/// @Failure 422 {object} @Error  "error info"
/// @Router /pets [get]
pub async fn create_pets() -> Result<Pet, Error> {
    unimplemented!()
}

pub struct PetApi;

impl PetApi {
    /// @Summary deletePet
    /// @Param id path integer true "pet id"
    /// @Param broken path integer
    /// @Success 204 "deleted"
    /// @Failure 404 {object} @Missing "not found"
    /// @Router /pets/{id} [delete]
    pub async fn delete(&self) {}

    /// @Summary orphan
    pub async fn orphan(&self) {}
}

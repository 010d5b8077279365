mod cvs;
mod sections;

pub use cvs::{
    create_cv_handler, delete_cv_handler, get_cv_handler, list_cvs_handler, patch_cv_handler,
    put_cv_handler, CvRequestDto,
};
pub use sections::{configure as configure_sections, configure_section, SectionRoute};

// utoipa path items live next to their handlers
pub use cvs::{
    __path_create_cv_handler, __path_delete_cv_handler, __path_get_cv_handler,
    __path_list_cvs_handler, __path_patch_cv_handler,
};

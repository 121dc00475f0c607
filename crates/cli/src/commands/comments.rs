//! Comment commands.

use cornershop_core::ProductId;

use crate::context::Context;
use crate::output;

/// List comments on a product.
///
/// # Errors
///
/// Returns a store error if the stored list is corrupt.
pub fn list(ctx: &Context, id: ProductId) -> Result<(), Box<dyn std::error::Error>> {
    let comments = ctx.state().comments().list(id)?;
    ctx.output()
        .emit(&comments, || output::comment_list(&comments))?;
    Ok(())
}

/// Add a comment.
///
/// # Errors
///
/// Returns `CommentError::Empty` for blank text.
pub fn add(ctx: &Context, id: ProductId, text: &str) -> Result<(), Box<dyn std::error::Error>> {
    let comments = ctx.state().comments().add(id, text)?;
    ctx.output()
        .emit(&comments, || output::comment_list(&comments))?;
    Ok(())
}

/// Remove a comment by index.
///
/// # Errors
///
/// Returns `CommentError::NotFound` for an out-of-range index.
pub fn remove(ctx: &Context, id: ProductId, index: usize) -> Result<(), Box<dyn std::error::Error>> {
    let comments = ctx.state().comments().remove(id, index)?;
    ctx.output()
        .emit(&comments, || output::comment_list(&comments))?;
    Ok(())
}

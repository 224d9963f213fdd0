//! Label service.

resource_wrapper! {
    /// The `Shipments/LabelService` resource.
    ///
    /// Exposes the generic [`Resource`](crate::resources::Resource)
    /// operations only; label methods are called through
    /// [`Resource::call`](crate::resources::Resource::call).
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let response = client
    ///     .labels()?
    ///     .call("createLabel", json!({ "label": label.to_value(), "mode": "calculate" }))
    ///     .await?;
    /// ```
    Labels => Labels
}

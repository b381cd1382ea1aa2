/// Conversion between two point types, usually geographic coordinates and coordinates in a plane.
///
/// Both directions return `None` if the point cannot be converted (e.g. a pole in Web Mercator).
pub trait Projection {
    /// Source point type.
    type InPoint;
    /// Target point type.
    type OutPoint;

    /// Converts a source point into the target point type.
    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint>;
    /// Converts a target point back into the source point type.
    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint>;
}

impl<P: Projection + ?Sized> Projection for Box<P> {
    type InPoint = P::InPoint;
    type OutPoint = P::OutPoint;

    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint> {
        (**self).project(input)
    }

    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint> {
        (**self).unproject(input)
    }
}

/// Projection that runs the inner projection backwards.
pub struct InvertedProjection<P> {
    inner: P,
}

impl<P> InvertedProjection<P> {
    /// Creates a new instance.
    pub fn new(inner: P) -> Self {
        Self { inner }
    }
}

impl<P: Projection> Projection for InvertedProjection<P> {
    type InPoint = P::OutPoint;
    type OutPoint = P::InPoint;

    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint> {
        self.inner.unproject(input)
    }

    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint> {
        self.inner.project(input)
    }
}

/// Projection that applies `first` and then feeds its output into `second`.
pub struct ChainProjection<First, Second> {
    first: First,
    second: Second,
}

impl<First, Second> ChainProjection<First, Second> {
    /// Creates a new instance.
    pub fn new(first: First, second: Second) -> Self {
        Self { first, second }
    }
}

impl<First, Second> Projection for ChainProjection<First, Second>
where
    First: Projection,
    Second: Projection<InPoint = First::OutPoint>,
{
    type InPoint = First::InPoint;
    type OutPoint = Second::OutPoint;

    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint> {
        self.second.project(&self.first.project(input)?)
    }

    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint> {
        self.first.unproject(&self.second.unproject(input)?)
    }
}

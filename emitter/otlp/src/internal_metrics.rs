use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

macro_rules! metrics {
    (
        $pub_container:ty {
            $field:ident: $internal_container:ident {
                $(
                    $(#[$meta:meta])*
                    $metric:ident: $ty:ident -> $pub_ty:ident,
                )*
            }
        }
    ) => {
        #[derive(Default)]
        pub(crate) struct $internal_container {
            $(
                $(#[$meta])*
                pub(crate) $metric: $ty,
            )*
        }

        impl $internal_container {
            pub fn sample(&self) -> impl Iterator<Item = (&'static str, usize)> + 'static {
                let $internal_container { $($metric),* } = self;

                [$(
                    (stringify!($metric), $metric.sample()),
                )*]
                .into_iter()
            }
        }

        impl $pub_container {
            $(
                $(#[$meta])*
                pub fn $metric(&self) -> $pub_ty {
                    self.$field.$metric.sample()
                }
            )*
        }
    };
}

#[derive(Default)]
pub(crate) struct Counter(AtomicUsize);

impl Counter {
    pub fn increment(&self) {
        self.increment_by(1);
    }

    pub fn increment_by(&self, by: usize) {
        self.0.fetch_add(by, Ordering::Relaxed);
    }

    pub fn sample(&self) -> usize {
        self.0.load(Ordering::Relaxed)
    }
}

metrics!(
    ExporterMetrics {
        metrics: InternalMetrics {
            /**
            A metric was encoded into an export request.
            */
            metric_encoded: Counter -> usize,
            /**
            A metric used an unsupported content or value type, so it was dropped.
            */
            metric_unsupported: Counter -> usize,
            /**
            A log or event was encoded into an export request.
            */
            log_encoded: Counter -> usize,
            /**
            A span was encoded into an export request.
            */
            span_encoded: Counter -> usize,
            /**
            A payload was rendered for diagnostics instead of, or as well as, being sent.
            */
            payload_dumped: Counter -> usize,
            /**
            A payload was encoded but not sent because the exporter is in dry-run mode.
            */
            payload_dry_run: Counter -> usize,
            /**
            A connection to a remote receiver was established successfully.
            */
            transport_conn_established: Counter -> usize,
            /**
            A connection to a remote receiver could not be established.
            */
            transport_conn_failed: Counter -> usize,
            /**
            A TLS handshake with a remote receiver was made successfully.
            */
            transport_conn_tls_handshake: Counter -> usize,
            /**
            A TLS handshake with a remote receiver could not be made.
            */
            transport_conn_tls_failed: Counter -> usize,
            /**
            A request was sent and the receiver responded with 200.
            */
            transport_request_sent: Counter -> usize,
            /**
            A request could not be sent, or the receiver responded with a status other than 200.
            */
            transport_request_failed: Counter -> usize,
            /**
            The body of a request was compressed using gzip.
            */
            transport_request_compress_gzip: Counter -> usize,
        }
    }
);

/**
Metrics produced by an [`crate::Exporter`] about its own activity.
*/
#[derive(Clone)]
pub struct ExporterMetrics {
    pub(crate) metrics: Arc<InternalMetrics>,
}

impl ExporterMetrics {
    /**
    Enumerate each counter by name along with its current value.
    */
    pub fn sample(&self) -> impl Iterator<Item = (&'static str, usize)> + 'static {
        self.metrics.sample()
    }
}

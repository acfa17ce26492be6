use backtrace::Backtrace;
use futures::FutureExt;
use hyper::{
	service::{make_service_fn, service_fn},
	Body, Request, Response, StatusCode,
};
use std::{cell::RefCell, convert::Infallible, future::Future, panic::AssertUnwindSafe, sync::Arc};

/**
Serve HTTP on `host:port`, calling `request_handler` with a shared `request_handler_context` for every request. A panic inside the handler is caught and turned into a 500 response carrying the panic message and backtrace, so one bad request cannot take the server down.
*/
pub async fn serve<C, H, F>(
	host: std::net::IpAddr,
	port: u16,
	request_handler_context: C,
	request_handler: H,
) -> hyper::Result<()>
where
	C: Send + Sync + 'static,
	H: Fn(Arc<C>, Request<Body>) -> F + Send + Sync + 'static,
	F: Future<Output = Response<Body>> + Send,
{
	// Create a task local that will store the panic message and backtrace if a panic occurs.
	tokio::task_local! {
		static PANIC_MESSAGE_AND_BACKTRACE: RefCell<Option<(String, Backtrace)>>;
	}
	async fn service<C, H, F>(
		request_handler: Arc<H>,
		request_handler_context: Arc<C>,
		request: Request<Body>,
	) -> Result<Response<Body>, Infallible>
	where
		C: Send + Sync + 'static,
		H: Fn(Arc<C>, Request<Body>) -> F + Send + Sync + 'static,
		F: Future<Output = Response<Body>> + Send,
	{
		let method = request.method().clone();
		let path = request.uri().path().to_owned();
		let result = AssertUnwindSafe(request_handler(request_handler_context, request))
			.catch_unwind()
			.await;
		let response = result.unwrap_or_else(|_| {
			tracing::error!(%method, %path, "request handler panicked");
			let body = PANIC_MESSAGE_AND_BACKTRACE.with(|panic_message_and_backtrace| {
				let panic_message_and_backtrace = panic_message_and_backtrace.borrow();
				match panic_message_and_backtrace.as_ref() {
					Some((message, backtrace)) => format!("{}\n{:?}", message, backtrace),
					None => "internal server error".to_owned(),
				}
			});
			let mut response = Response::new(Body::from(body));
			*response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
			response
		});
		Ok(response)
	}
	// Install a panic hook that will record the panic message and backtrace if a panic occurs.
	let hook = std::panic::take_hook();
	std::panic::set_hook(Box::new(|panic_info| {
		let value = (panic_info.to_string(), Backtrace::new());
		// Panics outside of a request task have no task local to record into.
		let _ = PANIC_MESSAGE_AND_BACKTRACE.try_with(|panic_message_and_backtrace| {
			panic_message_and_backtrace.borrow_mut().replace(value);
		});
	}));
	// Wrap the request handler and context with Arc to allow sharing a reference to it with each task.
	let request_handler = Arc::new(request_handler);
	let request_handler_context = Arc::new(request_handler_context);
	let service = make_service_fn(|_| {
		let request_handler = request_handler.clone();
		let request_handler_context = request_handler_context.clone();
		async move {
			Ok::<_, Infallible>(service_fn(move |request| {
				let request_handler = request_handler.clone();
				let request_handler_context = request_handler_context.clone();
				PANIC_MESSAGE_AND_BACKTRACE.scope(RefCell::new(None), async move {
					service(request_handler, request_handler_context, request).await
				})
			}))
		}
	});
	let addr = std::net::SocketAddr::new(host, port);
	let server = hyper::Server::try_bind(&addr)?;
	tracing::info!(%addr, "serving");
	let result = server.serve(service).await;
	std::panic::set_hook(hook);
	result
}
